//! Site data: per-file records, the aggregated tree and the per-cycle store.

mod record;
mod store;
mod tree;
mod url;

pub use record::{FileRecord, RESERVED_KEYS, categories};
pub use store::Store;
pub use tree::{FILES_KEY, SiteNode, SiteTree, flatten};
pub use url::{ExtensionMap, UrlResolver};
