//! Sitematter - front matter collection and site tree aggregation.
//!
//! A build cycle walks the project, reads the YAML front matter of every file
//! that starts with `---`, and aggregates the results into a [`SiteTree`]
//! mirroring the directory layout. Host pipelines call
//! [`pre_transform`] / [`post_transform`] around their own compilation step
//! to get the page metadata and record the compiled output.

pub mod build;
pub mod cli;
pub mod config;
pub mod cycle;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod matter;
pub mod site;
pub mod walker;
pub mod watch;

pub use cycle::Project;
pub use error::{MatterError, Result};
pub use hooks::{PageContext, Transformed, post_transform, pre_transform};
pub use site::{FileRecord, SiteNode, SiteTree, Store, flatten};
