//! One front matter collection cycle.
//!
//! # Flow
//!
//! ```text
//! store.clear()
//!     │
//!     ├── walk()                 ──► all project files (ignored subtrees pruned)
//!     │
//!     ├── par_iter per file      ──► has_front_matter? ──► read_front_matter
//!     │                              (first error aborts the cycle)
//!     │
//!     └── join, then single-threaded:
//!             store.extend(records)
//!             SiteTree::from_records(records)
//! ```
//!
//! The store is only filled after every file parsed, so a failed cycle
//! publishes nothing and leaves the store empty.

use crate::{
    error::{MatterError, Result},
    log_verbose,
    matter::{FrontMatter, has_front_matter, read_front_matter},
    site::{ExtensionMap, FILES_KEY, FileRecord, SiteTree, Store, UrlResolver, categories},
    walker::{IgnoreSet, walk},
};
use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// A project root plus what is needed to turn its files into records.
#[derive(Debug, Clone)]
pub struct Project<R = ExtensionMap> {
    root: PathBuf,
    ignore: IgnoreSet,
    urls: R,
}

impl Project<ExtensionMap> {
    /// Project with the default `md` → `html` url mapping.
    pub fn new(root: impl Into<PathBuf>, ignore: IgnoreSet) -> Self {
        Self::with_urls(root, ignore, ExtensionMap::default())
    }
}

impl<R: UrlResolver> Project<R> {
    pub fn with_urls(root: impl Into<PathBuf>, ignore: IgnoreSet, urls: R) -> Self {
        Self {
            root: root.into(),
            ignore,
            urls,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a full cycle: reset `store`, collect every record, fill `store`
    /// and reduce the records into a fresh tree.
    pub fn run_cycle(&self, store: &Store) -> Result<SiteTree> {
        store.clear();

        let records: Vec<Arc<FileRecord>> = self.collect()?.into_iter().map(Arc::new).collect();

        store.extend(records.iter().cloned());
        Ok(SiteTree::from_records(records))
    }

    /// Discover and parse every file carrying front matter.
    ///
    /// One task per file on the rayon pool; all are joined before returning.
    pub fn collect(&self) -> Result<Vec<FileRecord>> {
        let files = walk(&self.root, &self.ignore)?;
        log_verbose!("cycle"; "discovered {} files under {}", files.len(), self.root.display());

        let records: Vec<FileRecord> = files
            .par_iter()
            .map(|path| self.load(path))
            .filter_map(Result::transpose)
            .collect::<Result<_>>()?;

        log_verbose!("cycle"; "{} of {} files carry front matter", records.len(), files.len());
        Ok(records)
    }

    /// Build the record for a single file, or `None` if it has no front matter.
    pub fn load(&self, path: &Path) -> Result<Option<FileRecord>> {
        if !has_front_matter(path)? {
            return Ok(None);
        }
        let front_matter = read_front_matter(path)?;
        self.record(path, front_matter).map(Some)
    }

    fn record(&self, path: &Path, front_matter: FrontMatter) -> Result<FileRecord> {
        let url_err = || MatterError::Url {
            path: path.to_path_buf(),
        };

        let categories = categories(&self.root, path).ok_or_else(url_err)?;
        // `_files` holds a node's own records in the published tree
        if categories.iter().any(|segment| segment == FILES_KEY) {
            return Err(MatterError::ReservedName {
                path: path.to_path_buf(),
                name: FILES_KEY,
            });
        }
        let url = self.urls.url(&self.root, path).ok_or_else(url_err)?;

        Ok(FileRecord::new(
            path.to_path_buf(),
            categories,
            url,
            front_matter,
        ))
    }
}
