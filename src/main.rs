//! Sitematter command-line entry point.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sitematter::{
    build::build_site,
    cli::{Cli, Commands},
    config::SiteConfig,
    log, logger,
    site::{SiteNode, Store, flatten},
    watch::watch_for_changes_blocking,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::set_verbose(cli.verbose);
    let config = load_config(&cli)?;
    let store = Store::new();

    match &cli.command {
        Commands::Build => build_site(&config, &store).map(|_| ()),
        Commands::Tree { path, flat } => print_tree(&config, &store, path.as_deref(), *flat),
        Commands::Watch => watch_for_changes_blocking(&cli, config, &store),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load(cli).context("Failed to load config")?;
    config.validate()?;

    if !config.config_path.exists() {
        log!("config"; "no {} found, using defaults", cli.config.display());
    }
    Ok(config)
}

/// Run a cycle and print the tree (or a subtree) as JSON.
fn print_tree(config: &SiteConfig, store: &Store, path: Option<&str>, flat: bool) -> Result<()> {
    let tree = config.project().run_cycle(store)?;

    let segments: Vec<&str> = path
        .unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let node: &SiteNode = tree
        .get(&segments)
        .ok_or_else(|| anyhow!("no such directory in site tree: {}", segments.join("/")))?;

    let json = if flat {
        serde_json::to_string_pretty(&flatten(node))?
    } else {
        serde_json::to_string_pretty(node)?
    };
    println!("{json}");
    Ok(())
}
