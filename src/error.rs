//! Error types for front matter extraction and aggregation.
//!
//! Every variant is fatal for the current build cycle. Variants that come
//! from a single file carry its path so the failing source is named.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, detecting or parsing front matter.
#[derive(Debug, Error)]
pub enum MatterError {
    #[error("IO error when reading `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk project directory")]
    Walk(#[from] walkdir::Error),

    #[error("invalid front matter in `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("front matter in `{}` is not a mapping", path.display())]
    NotAMapping { path: PathBuf },

    #[error("cannot derive output url for `{}`", path.display())]
    Url { path: PathBuf },

    #[error("directory name `{name}` in the path of `{}` is reserved", path.display())]
    ReservedName { path: PathBuf, name: &'static str },
}

impl MatterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the file that caused the error, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::NotAMapping { path }
            | Self::Url { path }
            | Self::ReservedName { path, .. } => Some(path),
            Self::Walk(err) => err.path(),
        }
    }
}

pub type Result<T, E = MatterError> = std::result::Result<T, E>;
