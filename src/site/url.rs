//! Output url computation.
//!
//! How a source file maps to an output location belongs to the host build;
//! the aggregator only needs a url string per record, so it goes through
//! [`UrlResolver`].

use rustc_hash::FxHashMap;
use std::path::Path;

/// Computes the output-relative url of a source file.
pub trait UrlResolver: Send + Sync {
    /// `None` when no url can be derived for `source`.
    fn url(&self, root: &Path, source: &Path) -> Option<String>;
}

/// Keeps the path relative to the project root and swaps extensions by table
/// (`md` → `html` by default). Unlisted extensions are kept.
#[derive(Debug, Clone)]
pub struct ExtensionMap {
    map: FxHashMap<String, String>,
}

impl ExtensionMap {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();
        Self { map }
    }
}

impl Default for ExtensionMap {
    fn default() -> Self {
        Self::new([("md", "html")])
    }
}

impl UrlResolver for ExtensionMap {
    fn url(&self, root: &Path, source: &Path) -> Option<String> {
        let relative = source.strip_prefix(root).ok()?;

        let target = relative
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.map.get(ext));
        let relative = match target {
            Some(ext) => relative.with_extension(ext),
            None => relative.to_path_buf(),
        };

        // Ensure forward slashes
        let url = relative.to_str()?.replace('\\', "/");
        (!url.is_empty()).then_some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_maps_markdown() {
        let urls = ExtensionMap::default();
        let root = Path::new("/site");

        assert_eq!(
            urls.url(root, Path::new("/site/blog/2020/post.md")).as_deref(),
            Some("blog/2020/post.html")
        );
        assert_eq!(
            urls.url(root, Path::new("/site/about.html")).as_deref(),
            Some("about.html")
        );
        assert_eq!(urls.url(root, Path::new("/site/LICENSE")).as_deref(), Some("LICENSE"));
    }

    #[test]
    fn test_custom_table() {
        let urls = ExtensionMap::new([("sgr", "html"), ("sss", "css")]);
        let root = Path::new("/site");

        assert_eq!(
            urls.url(root, Path::new("/site/index.sgr")).as_deref(),
            Some("index.html")
        );
        assert_eq!(
            urls.url(root, Path::new("/site/css/main.sss")).as_deref(),
            Some("css/main.css")
        );
        // md is not in this table
        assert_eq!(urls.url(root, Path::new("/site/a.md")).as_deref(), Some("a.md"));
    }

    #[test]
    fn test_outside_root() {
        let urls = ExtensionMap::default();
        assert_eq!(urls.url(Path::new("/site"), Path::new("/other/a.md")), None);
        assert_eq!(urls.url(Path::new("/site"), Path::new("/site")), None);
    }
}
