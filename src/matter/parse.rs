use super::{DELIMITER, FrontMatter, decode, is_delimiter};
use crate::error::{MatterError, Result};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Seek, SeekFrom},
    path::Path,
};

/// Read and decode the front matter of a file known to start with `---`.
///
/// Skips the opening delimiter, then reads line by line until the closing
/// delimiter. Lines after it are never read.
pub fn read_front_matter(path: &Path) -> Result<FrontMatter> {
    let mut file = File::open(path).map_err(|err| MatterError::io(path, err))?;
    file.seek(SeekFrom::Start(DELIMITER.len() as u64))
        .map_err(|err| MatterError::io(path, err))?;

    parse_front_matter(BufReader::new(file), path)
}

/// Decode a front matter block from a reader positioned just after the
/// opening delimiter. `path` is only used to label errors.
pub fn parse_front_matter<R: BufRead>(reader: R, path: &Path) -> Result<FrontMatter> {
    let block = collect_block(reader).map_err(|err| MatterError::io(path, err))?;
    decode(&block, path)
}

fn collect_block<R: BufRead>(reader: R) -> io::Result<String> {
    let mut block = String::new();
    for line in reader.lines() {
        let line = line?;
        if is_delimiter(&line) {
            break;
        }
        block.push_str(&line);
        block.push('\n');
    }
    Ok(block)
}

/// Front matter block and body of an in-memory document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Raw YAML between the delimiters.
    pub matter: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Split a document into its front matter block and body.
///
/// Returns `None` when `content` does not start with `---`. Without a closing
/// delimiter the whole remainder is the block and the body is empty.
pub fn split_front_matter(content: &str) -> Option<Split<'_>> {
    let rest = content.strip_prefix(DELIMITER)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let end = offset + line.len();
        if is_delimiter(line) {
            return Some(Split {
                matter: &rest[..offset],
                body: &rest[end..],
            });
        }
        offset = end;
    }

    Some(Split {
        matter: rest,
        body: "",
    })
}
