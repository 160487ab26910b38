//! Build-fatal asset errors.
//!
//! Every variant carries enough context (referencing file, specifier, output
//! path) to locate the offending reference. Non-local stylesheet references
//! are not errors and never reach this type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T, E = RebaseError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RebaseError {
    #[error(
        "cannot resolve `{specifier}` referenced from `{}` (no file at `{}`)",
        referencing.display(),
        attempted.display()
    )]
    UnresolvedAsset {
        referencing: PathBuf,
        specifier: String,
        attempted: PathBuf,
    },

    #[error(
        "content token `{token}` collides: `{}` and `{}` have different bytes",
        first.display(),
        second.display()
    )]
    HashCollision {
        token: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RebaseError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
