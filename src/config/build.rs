//! `[build]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

/// `[build]` section in sitematter.toml.
///
/// # Example
/// ```toml
/// [build]
/// root = "."
/// output = "public"
/// ignore = ["**/node_modules", "drafts/**"]
/// data_file = "site.json"
/// markdown = true
///
/// [build.extensions]
/// md = "html"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Output directory. Never scanned for front matter.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Glob patterns excluded from discovery, relative to the root or absolute.
    #[serde(default = "defaults::build::ignore")]
    #[educe(Default = defaults::build::ignore())]
    pub ignore: Vec<String>,

    /// Site tree dump, relative to `output`.
    #[serde(default = "defaults::build::data_file")]
    #[educe(Default = defaults::build::data_file())]
    pub data_file: PathBuf,

    /// Render `.md` bodies to HTML instead of copying them through.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub markdown: bool,

    /// Source extension → output extension, used for record urls.
    #[serde(default = "defaults::build::extensions")]
    #[educe(Default = defaults::build::extensions())]
    pub extensions: BTreeMap<String, String>,
}
