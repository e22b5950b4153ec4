//! Front matter detection, extraction and decoding.
//!
//! A source file carries front matter when its first three bytes are the
//! delimiter `---`. The block runs until the next line that is exactly `---`
//! (surrounding whitespace ignored) and is decoded as YAML.
//!
//! ```text
//! ---              ◄── opening delimiter (first 3 bytes)
//! title: Hello     ◄── YAML block
//! tags: [a, b]
//! ---              ◄── closing delimiter line
//! Body text        ◄── body
//! ```
//!
//! When the closing delimiter is missing, the whole remainder of the file is
//! the block and the body is empty. [`read_front_matter`] and
//! [`split_front_matter`] share [`is_delimiter`] so the two never disagree.

mod detect;
mod parse;

pub use detect::has_front_matter;
pub use parse::{Split, parse_front_matter, read_front_matter, split_front_matter};

use crate::error::{MatterError, Result};
use std::path::Path;

/// Front matter delimiter.
pub const DELIMITER: &str = "---";

/// Decoded front matter: string keys to arbitrary values.
///
/// Stored as a JSON object so it can be handed to templates as-is.
pub type FrontMatter = serde_json::Map<String, serde_json::Value>;

/// Whether `content` opens with the front matter delimiter.
#[inline]
pub fn starts_with_delimiter(content: &str) -> bool {
    content.as_bytes().starts_with(DELIMITER.as_bytes())
}

/// Whether a single line closes a front matter block.
#[inline]
pub fn is_delimiter(line: &str) -> bool {
    line.trim() == DELIMITER
}

/// Decode a YAML block into [`FrontMatter`].
///
/// An empty block or a YAML null decodes to an empty mapping. Any top-level
/// value other than a mapping is rejected.
pub(crate) fn decode(block: &str, path: &Path) -> Result<FrontMatter> {
    if block.trim().is_empty() {
        return Ok(FrontMatter::new());
    }

    let parse_err = |source| MatterError::Parse {
        path: path.to_path_buf(),
        source,
    };

    match serde_yaml::from_str::<serde_yaml::Value>(block).map_err(parse_err)? {
        serde_yaml::Value::Null => Ok(FrontMatter::new()),
        value @ serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value).map_err(parse_err),
        _ => Err(MatterError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_ok(block: &str) -> FrontMatter {
        decode(block, Path::new("test.md")).unwrap()
    }

    #[test]
    fn test_is_delimiter() {
        assert!(is_delimiter("---"));
        assert!(is_delimiter("---\n"));
        assert!(is_delimiter("  ---\r\n"));
        assert!(!is_delimiter("----"));
        assert!(!is_delimiter("-- -"));
        assert!(!is_delimiter("--- # comment"));
    }

    #[test]
    fn test_starts_with_delimiter() {
        assert!(starts_with_delimiter("---\ntitle: x"));
        assert!(starts_with_delimiter("---"));
        assert!(!starts_with_delimiter("--"));
        assert!(!starts_with_delimiter(" ---"));
        assert!(!starts_with_delimiter(""));
    }

    #[test]
    fn test_decode_scalars_sequences_and_nesting() {
        let matter = decode_ok("title: Hello\ncount: 3\ndraft: false\ntags: [a, b]\nauthor:\n  name: Ann\n");
        assert_eq!(matter["title"], json!("Hello"));
        assert_eq!(matter["count"], json!(3));
        assert_eq!(matter["draft"], json!(false));
        assert_eq!(matter["tags"], json!(["a", "b"]));
        assert_eq!(matter["author"], json!({ "name": "Ann" }));
    }

    #[test]
    fn test_decode_empty_block() {
        assert!(decode_ok("").is_empty());
        assert!(decode_ok("\n\n").is_empty());
    }

    #[test]
    fn test_decode_rejects_non_mapping() {
        let err = decode("just a string\n", Path::new("a.md")).unwrap_err();
        assert!(matches!(err, MatterError::NotAMapping { .. }));

        let err = decode("- a\n- b\n", Path::new("a.md")).unwrap_err();
        assert!(matches!(err, MatterError::NotAMapping { .. }));
    }

    #[test]
    fn test_decode_malformed_yaml_names_file() {
        let err = decode("title: [unclosed\n", Path::new("/site/bad.md")).unwrap_err();
        assert!(matches!(err, MatterError::Parse { .. }));
        assert_eq!(err.path(), Some(Path::new("/site/bad.md")));
    }
}
