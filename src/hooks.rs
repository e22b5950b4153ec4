//! Per-file pipeline hooks.
//!
//! The host pipeline calls [`pre_transform`] before compiling a file and
//! [`post_transform`] after. Both are pass-through for content they do not
//! own and talk to the cycle's [`Store`] explicitly.
//!
//! The page metadata for the file being compiled is returned as a
//! [`PageContext`] value alongside the stripped content, so concurrent calls
//! for different files never share it.

use crate::{
    matter::{FrontMatter, split_front_matter},
    site::Store,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Front matter of the file currently being compiled, as seen by templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PageContext(FrontMatter);

impl PageContext {
    pub fn new(front_matter: FrontMatter) -> Self {
        Self(front_matter)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of [`pre_transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed<'a> {
    /// Content with any front matter block removed
    pub content: &'a str,
    /// Page metadata to render `content` with
    pub page: PageContext,
}

/// Look up the cached record for `resource_path`, strip the front matter
/// block from `content` and return both.
///
/// Files not in the store get an empty [`PageContext`]. Content that does
/// not start with `---` is returned unchanged.
pub fn pre_transform<'a>(store: &Store, content: &'a str, resource_path: &Path) -> Transformed<'a> {
    let page = store
        .get(resource_path)
        .map(|record| PageContext::new(record.front_matter.clone()))
        .unwrap_or_default();

    let content = split_front_matter(content).map_or(content, |split| split.body);

    Transformed { content, page }
}

/// Record the compiled output of `resource_path` in the store and pass it on
/// unchanged.
pub fn post_transform(store: &Store, content: String, resource_path: &Path) -> String {
    if let Some(record) = store.get(resource_path) {
        record.set_compiled_content(content.clone());
    }
    content
}
