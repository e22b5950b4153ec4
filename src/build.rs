//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── run_cycle()  ──► Store filled, SiteTree built
//!     │                    (nothing written if any file fails to parse)
//!     │
//!     ├── render_record() per record, in parallel
//!     │       │
//!     │       └── read ─► pre_transform ─► compile ─► post_transform ─► write output/<url>
//!     │
//!     └── write output/<data_file>  ──► site tree as JSON
//! ```

use crate::{
    config::SiteConfig,
    hooks::{PageContext, post_transform, pre_transform},
    log,
    site::{FileRecord, SiteTree, Store},
};
use anyhow::{Context, Result, bail};
use pulldown_cmark::{Options, Parser, html};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::{fs, path::Path, sync::Arc};

/// Turns a file body into its output form.
///
/// `page` is the file's own front matter, `site` the whole aggregate.
pub trait Compile: Send + Sync {
    fn compile(&self, content: &str, page: &PageContext, site: &SiteTree) -> Result<String>;
}

/// Copies the body through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Compile for Passthrough {
    fn compile(&self, content: &str, _page: &PageContext, _site: &SiteTree) -> Result<String> {
        Ok(content.to_owned())
    }
}

/// CommonMark (plus tables, strikethrough and footnotes) to HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct Markdown;

impl Compile for Markdown {
    fn compile(&self, content: &str, _page: &PageContext, _site: &SiteTree) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES;
        let parser = Parser::new_ext(content, options);

        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// Pick the compiler for a source file.
fn compiler_for(path: &Path, markdown: bool) -> &'static dyn Compile {
    let is_md = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

    if markdown && is_md { &Markdown } else { &Passthrough }
}

/// Outcome of a successful build.
#[derive(Debug)]
pub struct Built {
    pub tree: SiteTree,
    /// Number of files written under the output directory
    pub pages: usize,
}

/// Build the site: run one cycle, render every record, dump the tree.
///
/// The store is reset at the start, so on return it holds exactly this
/// build's records, each with its compiled content.
pub fn build_site(config: &SiteConfig, store: &Store) -> Result<Built> {
    let project = config.project();

    let tree = project
        .run_cycle(store)
        .context("Failed to collect front matter")?;
    log!("cycle"; "aggregated {} files", tree.len());

    let records = store.records();
    check_unique_urls(&records)?;
    records
        .par_iter()
        .try_for_each(|record| render_record(record, config, store, &tree))?;
    log!("build"; "wrote {} pages to {}", records.len(), config.build.output.display());

    write_site_data(config, &tree)?;

    Ok(Built {
        tree,
        pages: records.len(),
    })
}

/// Fail if two sources would be written to the same output file.
fn check_unique_urls(records: &[Arc<FileRecord>]) -> Result<()> {
    let mut seen: FxHashMap<&str, &Path> = FxHashMap::default();
    for record in records {
        if let Some(other) = seen.insert(&record.url, &record.path) {
            bail!(
                "`{}` and `{}` both map to output `{}`",
                other.display(),
                record.path.display(),
                record.url
            );
        }
    }
    Ok(())
}

/// One file through the pipeline: read, pre-hook, compile, post-hook, write.
fn render_record(
    record: &FileRecord,
    config: &SiteConfig,
    store: &Store,
    tree: &SiteTree,
) -> Result<()> {
    let source = &record.path;
    let content = fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let pre = pre_transform(store, &content, source);
    let compiled = compiler_for(source, config.build.markdown)
        .compile(pre.content, &pre.page, tree)
        .with_context(|| format!("Failed to compile {}", source.display()))?;
    let compiled = post_transform(store, compiled, source);

    let dest = config.build.output.join(&record.url);
    write_file(&dest, compiled.as_bytes())?;

    crate::log_verbose!("build"; "{} -> {}", source.display(), record.url);
    Ok(())
}

fn write_site_data(config: &SiteConfig, tree: &SiteTree) -> Result<()> {
    let json = serde_json::to_string_pretty(tree).context("Failed to serialize site tree")?;
    write_file(&config.data_path(), json.as_bytes())
}

fn write_file(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(dest, bytes).with_context(|| format!("Failed to write {}", dest.display()))
}
