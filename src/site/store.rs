//! Per-cycle record store.
//!
//! Holds the records of the current build cycle keyed by absolute source
//! path, for the hook stages that run once per file during compilation.
//!
//! # Lifecycle
//!
//! 1. Cleared at the start of every cycle
//! 2. Filled once every file of the cycle parsed successfully
//! 3. Read by [`pre_transform`](crate::hooks::pre_transform), written by
//!    [`post_transform`](crate::hooks::post_transform)
//!
//! A failed cycle leaves the store empty until the next successful one.
//!
//! # Thread Safety
//!
//! Uses `RwLock` to allow:
//! - Multiple concurrent lookups (hooks for different files)
//! - Exclusive writes (clear/fill at cycle boundaries)

use super::record::FileRecord;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Debug, Default)]
pub struct Store {
    records: RwLock<FxHashMap<PathBuf, Arc<FileRecord>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record. Call at the start of each cycle.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Insert or replace the record for its source path.
    pub fn insert(&self, record: Arc<FileRecord>) {
        self.records.write().insert(record.path.clone(), record);
    }

    /// Insert many records under a single write lock.
    pub fn extend<I>(&self, records: I)
    where
        I: IntoIterator<Item = Arc<FileRecord>>,
    {
        let mut map = self.records.write();
        for record in records {
            map.insert(record.path.clone(), record);
        }
    }

    pub fn get(&self, path: &Path) -> Option<Arc<FileRecord>> {
        self.records.read().get(path).cloned()
    }

    /// All records, sorted by source path.
    pub fn records(&self) -> Vec<Arc<FileRecord>> {
        let mut records: Vec<_> = self.records.read().values().cloned().collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        records
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
