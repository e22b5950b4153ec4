//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::{collections::BTreeMap, path::PathBuf};

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn ignore() -> Vec<String> {
        vec!["**/node_modules".into(), "**/.git".into()]
    }

    pub fn data_file() -> PathBuf {
        "site.json".into()
    }

    pub fn extensions() -> BTreeMap<String, String> {
        BTreeMap::from([("md".into(), "html".into())])
    }
}
