//! Asset and referencing-file kinds.

use std::path::Path;

/// Kind of file that contains asset references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// JavaScript/TypeScript module handled by the host bundler.
    Script,
    /// CSS file, either an entry or one discovered through another reference.
    Stylesheet,
}

impl SourceKind {
    /// Classify a referencing file by extension. Anything not CSS is a script.
    pub fn from_path(path: &Path) -> Self {
        if AssetKind::from_path(path) == AssetKind::Stylesheet {
            Self::Stylesheet
        } else {
            Self::Script
        }
    }
}

/// Kind of emitted asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Stylesheet: scanned for nested references and rewritten before emission.
    Stylesheet,
    /// Any other file: copied byte for byte.
    Binary,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("css") => Self::Stylesheet,
            _ => Self::Binary,
        }
    }
}
