use gix::{
    bstr::{BStr, BString, ByteSlice},
    glob::wildmatch,
};
use std::path::{Path, PathBuf};

/// Matches discovered paths against user-supplied ignore globs.
///
/// Every pattern is tried against both the absolute path and the path
/// relative to the project root, so `drafts/**` and `/abs/site/drafts/**`
/// exclude the same files.
///
/// - `*` never crosses a `/`
/// - `**` matches across directories (`**/node_modules`, `drafts/**`)
/// - A pattern that is malformed or matches nothing just excludes nothing
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    root: PathBuf,
    patterns: Vec<BString>,
    /// Directories excluded by path prefix rather than by glob.
    prefixes: Vec<PathBuf>,
}

impl IgnoreSet {
    /// Compile patterns for a project rooted at `root`. Blank patterns are dropped.
    pub fn new<I, S>(root: &Path, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_owned())
            .filter(|p| !p.is_empty())
            .map(BString::from)
            .collect();

        Self {
            root: root.to_path_buf(),
            patterns,
            prefixes: Vec::new(),
        }
    }

    /// Also exclude everything under `dir` (e.g. the build output).
    pub fn exclude_dir(mut self, dir: &Path) -> Self {
        self.prefixes.push(dir.to_path_buf());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.prefixes.is_empty()
    }

    /// Check if a path is excluded.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }
        if self.patterns.is_empty() {
            return false;
        }

        let absolute = to_slash(path);
        let relative = path
            .strip_prefix(&self.root)
            .ok()
            .map(to_slash)
            .filter(|rel| !rel.is_empty());

        self.patterns.iter().any(|pattern| {
            let pattern = pattern.as_bstr();
            matches(pattern, &absolute)
                || relative.as_deref().is_some_and(|rel| matches(pattern, rel))
        })
    }
}

#[inline]
fn matches(pattern: &BStr, path: &str) -> bool {
    wildmatch(
        pattern,
        path.into(),
        wildmatch::Mode::NO_MATCH_SLASH_LITERAL,
    )
}

/// Path as a `/`-separated string for glob matching.
fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
