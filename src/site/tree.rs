//! Hierarchical aggregate of file records.
//!
//! # Structure
//!
//! ```text
//! root                    files: [index.md]
//! ├── blog                files: [intro.md]
//! │   └── 2020            files: [post.md, recap.md]
//! └── docs                files: []
//!     └── guide           files: [setup.md]
//! ```
//!
//! Each node owns the records that live directly in its directory and one
//! child per subdirectory that (transitively) holds a record. The tree is
//! rebuilt from scratch every cycle and only ever grows during a cycle.

use super::record::FileRecord;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{collections::BTreeMap, sync::Arc};

/// Key under which a node's own records are published to templates.
pub const FILES_KEY: &str = "_files";

/// The site tree is just its root node.
pub type SiteTree = SiteNode;

/// One directory level of the site tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteNode {
    children: BTreeMap<String, SiteNode>,
    files: Vec<Arc<FileRecord>>,
}

impl SiteNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a complete set of records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<FileRecord>>,
    {
        records.into_iter().fold(Self::new(), |mut tree, record| {
            tree.insert(record);
            tree
        })
    }

    /// Insert a record at the node named by its categories, creating
    /// intermediate nodes as needed. Records keep arrival order.
    pub fn insert(&mut self, record: Arc<FileRecord>) {
        let mut node = self;
        for segment in &record.categories {
            node = node.children.entry(segment.clone()).or_default();
        }
        node.files.push(record);
    }

    /// Direct child for a directory name.
    pub fn child(&self, name: &str) -> Option<&SiteNode> {
        self.children.get(name)
    }

    /// Descend through a sequence of directory names. An empty path is `self`.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&SiteNode> {
        path.iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// Child nodes in directory-name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &SiteNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Records directly in this directory.
    pub fn files(&self) -> &[Arc<FileRecord>] {
        &self.files
    }

    /// Number of records reachable from this node.
    pub fn len(&self) -> usize {
        self.files.len() + self.children.values().map(SiteNode::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.children.values().all(SiteNode::is_empty)
    }
}

/// Every record reachable from `node`: its own records first, then each
/// child's in directory-name order. Works on any node, not just the root.
pub fn flatten(node: &SiteNode) -> Vec<Arc<FileRecord>> {
    fn collect(node: &SiteNode, out: &mut Vec<Arc<FileRecord>>) {
        out.extend(node.files.iter().cloned());
        for child in node.children.values() {
            collect(child, out);
        }
    }

    let mut out = Vec::with_capacity(node.len());
    collect(node, &mut out);
    out
}

impl Serialize for SiteNode {
    /// `{ "<dir>": <node>, ..., "_files": [<record>, ...] }`
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len() + 1))?;
        for (name, child) in &self.children {
            map.serialize_entry(name, child)?;
        }
        map.serialize_entry(FILES_KEY, &self.files)?;
        map.end()
    }
}
