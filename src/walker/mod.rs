//! Project file discovery.
//!
//! Lists every file below the project root, skipping entries matched by the
//! [`IgnoreSet`]. An ignored directory is never entered, so its whole subtree
//! is pruned.

mod ignore;

pub use ignore::IgnoreSet;

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect all files under `root`.
///
/// Symlinks are followed. Any filesystem error aborts the walk. Entries are
/// sorted by file name within each directory, though callers should not rely
/// on the order.
pub fn walk(root: &Path, ignore: &IgnoreSet) -> Result<Vec<PathBuf>> {
    let entries = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !ignore.is_ignored(entry.path()));

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
