use crate::matter::FrontMatter;
use parking_lot::RwLock;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::path::{Component, Path, PathBuf};

/// Keys a record fills in itself. Front matter entries with these names are
/// left out of the serialized record.
pub const RESERVED_KEYS: [&str; 4] = ["_path", "_categories", "_url", "_content"];

/// Per-file result of one build cycle.
///
/// Everything except `compiled_content` is fixed at creation. The compiled
/// output is filled in later by [`post_transform`](crate::hooks::post_transform)
/// through a shared handle, hence the lock.
///
/// Serializes like the page data templates see: front matter keys at the top
/// level next to `_path`, `_categories`, `_url` and `_content`.
#[derive(Debug)]
pub struct FileRecord {
    /// Absolute source path
    pub path: PathBuf,
    /// Directory names between the project root and the file
    pub categories: Vec<String>,
    /// Output-relative url (e.g. `blog/2020/post.html`)
    pub url: String,
    pub front_matter: FrontMatter,
    compiled_content: RwLock<Option<String>>,
}

impl FileRecord {
    pub fn new(path: PathBuf, categories: Vec<String>, url: String, front_matter: FrontMatter) -> Self {
        Self {
            path,
            categories,
            url,
            front_matter,
            compiled_content: RwLock::new(None),
        }
    }

    /// Compiled output, once the post-compilation hook has run.
    pub fn compiled_content(&self) -> Option<String> {
        self.compiled_content.read().clone()
    }

    pub fn set_compiled_content(&self, content: String) {
        *self.compiled_content.write() = Some(content);
    }
}

impl Clone for FileRecord {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            categories: self.categories.clone(),
            url: self.url.clone(),
            front_matter: self.front_matter.clone(),
            compiled_content: RwLock::new(self.compiled_content()),
        }
    }
}

impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.categories == other.categories
            && self.url == other.url
            && self.front_matter == other.front_matter
            && *self.compiled_content.read() == *other.compiled_content.read()
    }
}

impl Serialize for FileRecord {
    /// Computed keys first, then front matter minus [`RESERVED_KEYS`].
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let content = self.compiled_content();

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("_path", &self.path)?;
        map.serialize_entry("_categories", &self.categories)?;
        map.serialize_entry("_url", &self.url)?;
        if let Some(content) = &content {
            map.serialize_entry("_content", content)?;
        }
        for (key, value) in &self.front_matter {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Directory names between `root` and `path`, in order.
///
/// `root/blog/2020/post.md` → `["blog", "2020"]`; a file directly in `root`
/// has no categories. `None` if `path` is not below `root` or a segment is
/// not valid UTF-8.
pub fn categories(root: &Path, path: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(root).ok()?;
    relative
        .parent()?
        .components()
        .map(|component| match component {
            Component::Normal(name) => name.to_str().map(str::to_owned),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> FileRecord {
        let mut matter = FrontMatter::new();
        matter.insert("title".into(), json!("Hello"));
        FileRecord::new(
            PathBuf::from("/site/blog/hello.md"),
            vec!["blog".into()],
            "blog/hello.html".into(),
            matter,
        )
    }

    #[test]
    fn test_categories_nested() {
        let cats = categories(Path::new("/root"), Path::new("/root/blog/2020/post.md"));
        assert_eq!(cats, Some(vec!["blog".to_string(), "2020".to_string()]));
    }

    #[test]
    fn test_categories_root_file() {
        let cats = categories(Path::new("/root"), Path::new("/root/index.md"));
        assert_eq!(cats, Some(vec![]));
    }

    #[test]
    fn test_categories_outside_root() {
        assert_eq!(categories(Path::new("/root"), Path::new("/other/a.md")), None);
        assert_eq!(categories(Path::new("/root"), Path::new("/root")), None);
    }

    #[test]
    fn test_compiled_content_roundtrip() {
        let record = record();
        assert_eq!(record.compiled_content(), None);

        record.set_compiled_content("<p>hi</p>".into());
        assert_eq!(record.compiled_content().as_deref(), Some("<p>hi</p>"));

        let copy = record.clone();
        assert_eq!(copy, record);
    }

    #[test]
    fn test_serialize_shape() {
        let record = record();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "_path": "/site/blog/hello.md",
                "_categories": ["blog"],
                "_url": "blog/hello.html",
                "title": "Hello",
            })
        );

        record.set_compiled_content("done".into());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_content"], json!("done"));
    }

    #[test]
    fn test_front_matter_cannot_override_computed_keys() {
        let mut matter = FrontMatter::new();
        matter.insert("_url".into(), json!("elsewhere.html"));
        matter.insert("_categories".into(), json!(["x"]));
        matter.insert("_path".into(), json!("/etc/passwd"));
        matter.insert("_content".into(), json!("fake"));
        matter.insert("title".into(), json!("Kept"));
        let record = FileRecord::new(PathBuf::from("/s/a.md"), Vec::new(), "a.html".into(), matter);

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text.matches("\"_url\"").count(), 1);
        assert_eq!(text.matches("\"_content\"").count(), 0);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "_path": "/s/a.md",
                "_categories": [],
                "_url": "a.html",
                "title": "Kept",
            })
        );

        record.set_compiled_content("<p>real</p>".into());
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text.matches("\"_content\"").count(), 1);
        assert!(text.contains("<p>real</p>"));

        // the record itself keeps the raw front matter
        assert_eq!(record.front_matter["_url"], json!("elsewhere.html"));
    }
}
