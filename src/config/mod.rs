//! Project configuration management for `sitematter.toml`.
//!
//! # Sections
//!
//! | Section              | Purpose                                   |
//! |----------------------|-------------------------------------------|
//! | `[build]`            | Root, output, ignore globs, data file     |
//! | `[build.extensions]` | Source → output extension mapping for urls |
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "public"
//! ignore = ["**/node_modules", "drafts/**"]
//!
//! [build.extensions]
//! md = "html"
//! ```
//!
//! A missing config file is not an error: every field has a default.

mod build;
pub mod defaults;
mod error;

pub use build::BuildConfig;
pub use error::ConfigError;

use crate::{
    cli::Cli,
    cycle::Project,
    site::ExtensionMap,
    walker::IgnoreSet,
};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing sitematter.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `cli.config` under the CLI root (or the current directory),
    /// falling back to defaults when the file does not exist, then apply
    /// CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let path = root.join(&cli.config);

        let mut config = if path.exists() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Absolute path of the site tree dump.
    pub fn data_path(&self) -> PathBuf {
        self.build.output.join(&self.build.data_file)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        // The config file lives under the CLI root. A root given on the
        // command line wins over `[build] root`.
        let base = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let root = match (&cli.root, &self.build.root) {
            (None, Some(root)) => base.join(root),
            _ => base.clone(),
        };

        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }

        self.config_path = Self::normalize_path(&base.join(&cli.config));
        let root = Self::normalize_path(&root);
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.set_root(&root);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a cycle runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = self.get_root();
        if !root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "[build.root] `{}` is not a directory",
                root.display()
            )));
        }

        if self.build.output == root {
            return Err(ConfigError::Validation(
                "[build.output] must not be the project root".into(),
            ));
        }

        let data_file = &self.build.data_file;
        if data_file.as_os_str().is_empty() || data_file.is_absolute() {
            return Err(ConfigError::Validation(
                "[build.data_file] must be a relative file name".into(),
            ));
        }

        if let Some(ext) = self
            .build
            .extensions
            .iter()
            .flat_map(|(from, to)| [from, to])
            .find(|ext| ext.is_empty() || ext.contains(['.', '/', '\\']))
        {
            return Err(ConfigError::Validation(format!(
                "[build.extensions] `{ext}` must be a bare extension without dots"
            )));
        }

        Ok(())
    }

    /// Ignore set for the walker: the configured globs plus the output directory.
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::new(self.get_root(), &self.build.ignore).exclude_dir(&self.build.output)
    }

    pub fn url_resolver(&self) -> ExtensionMap {
        ExtensionMap::new(
            self.build
                .extensions
                .iter()
                .map(|(from, to)| (from.as_str(), to.as_str())),
        )
    }

    /// Everything a cycle needs, derived from this configuration.
    pub fn project(&self) -> Project {
        Project::with_urls(self.get_root(), self.ignore_set(), self.url_resolver())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use tempfile::TempDir;

    fn cli(root: &Path) -> Cli {
        Cli {
            root: Some(root.to_path_buf()),
            output: None,
            config: PathBuf::from("sitematter.toml"),
            verbose: false,
            command: Commands::Build,
        }
    }

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(r#"
            [build]
            output = "dist"
            ignore = ["drafts/**"]
            data_file = "data/site.json"
        "#).unwrap();

        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.ignore, ["drafts/**"]);
        assert_eq!(config.build.data_file, PathBuf::from("data/site.json"));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[build\noutput = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let result = SiteConfig::from_str("[serve]\nport = 5277");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SiteConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load(&cli(dir.path())).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.get_root(), root);
        assert_eq!(config.build.output, root.join("public"));
        assert_eq!(config.data_path(), root.join("public/site.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reads_file_and_applies_cli_output() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sitematter.toml"),
            "[build]\noutput = \"dist\"\nmarkdown = false\n",
        )
        .unwrap();
        let root = dir.path().canonicalize().unwrap();

        let config = SiteConfig::load(&cli(dir.path())).unwrap();
        assert_eq!(config.build.output, root.join("dist"));
        assert!(!config.build.markdown);

        let mut args = cli(dir.path());
        args.output = Some(PathBuf::from("out"));
        let config = SiteConfig::load(&args).unwrap();
        assert_eq!(config.build.output, root.join("out"));
    }

    #[test]
    fn test_ignore_set_always_excludes_output() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load(&cli(dir.path())).unwrap();
        let ignore = config.ignore_set();

        assert!(ignore.is_ignored(&config.build.output.join("index.html")));
        assert!(ignore.is_ignored(&config.get_root().join("theme/node_modules")));
        assert!(!ignore.is_ignored(&config.get_root().join("index.md")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let base = SiteConfig::load(&cli(dir.path())).unwrap();

        let mut config = base.clone();
        config.build.data_file = PathBuf::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = base.clone();
        config.build.extensions.insert(".md".into(), "html".into());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = base.clone();
        config.build.output = config.get_root().to_path_buf();
        assert!(config.validate().is_err());

        let mut config = base;
        config.set_root(&dir.path().join("missing"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_resolver_uses_extension_table() {
        use crate::site::UrlResolver;

        let mut config = SiteConfig::default();
        config.build.extensions.insert("adoc".into(), "htm".into());
        let urls = config.url_resolver();

        let root = Path::new("/site");
        assert_eq!(urls.url(root, Path::new("/site/a/b.md")).as_deref(), Some("a/b.html"));
        assert_eq!(urls.url(root, Path::new("/site/c.adoc")).as_deref(), Some("c.htm"));
        assert_eq!(urls.url(root, Path::new("/site/d.txt")).as_deref(), Some("d.txt"));
    }
}
