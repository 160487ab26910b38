//! Output naming and placement (side effects).
//!
//! ```text
//! src/img/logo.png ──address──► 3f2a9c1e ──allocate──► static/3f2a9c1e.png
//!                                                       │
//!                                         place ──► <output>/static/3f2a9c1e.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RebaseError, Result};

use super::{EmittedAsset, ResolvedAsset};

/// How output filenames are built from a resolved asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingPolicy {
    /// `<token>.<ext>`
    #[default]
    HashOnly,
    /// `<stem>_<token>.<ext>`; the token alone keeps names unique.
    ///
    /// Identical bytes under different stems share one file, named after
    /// the path that registered the content first.
    KeepName,
}

/// Decides output paths and writes asset bytes under the output directory.
#[derive(Debug, Clone)]
pub struct OutputPlacer {
    /// Build output directory (absolute).
    output_dir: PathBuf,
    /// Subfolder for all assets, `/`-separated; empty for the output root.
    folder: String,
    naming: NamingPolicy,
}

impl OutputPlacer {
    pub fn new(output_dir: impl Into<PathBuf>, folder: &str, naming: NamingPolicy) -> Self {
        Self {
            output_dir: output_dir.into(),
            folder: folder.trim_matches('/').to_string(),
            naming,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory every asset lands in: `<output>/<folder>`.
    pub fn asset_dir(&self) -> PathBuf {
        if self.folder.is_empty() {
            self.output_dir.clone()
        } else {
            self.output_dir.join(&self.folder)
        }
    }

    /// Output-relative path for a newly emitted asset.
    pub fn allocate(&self, asset: &ResolvedAsset) -> String {
        let name = match self.naming {
            NamingPolicy::HashOnly => asset.token.clone(),
            NamingPolicy::KeepName => {
                let stem = asset
                    .path
                    .file_stem()
                    .map(|s| sanitize_stem(&s.to_string_lossy()))
                    .unwrap_or_default();
                if stem.is_empty() {
                    asset.token.clone()
                } else {
                    format!("{stem}_{}", asset.token)
                }
            }
        };

        let file = if asset.extension.is_empty() {
            name
        } else {
            format!("{name}.{}", asset.extension)
        };

        if self.folder.is_empty() {
            file
        } else {
            format!("{}/{file}", self.folder)
        }
    }

    /// Absolute destination of an emitted asset.
    pub fn destination(&self, asset: &EmittedAsset) -> PathBuf {
        self.output_dir.join(&asset.output_path)
    }

    /// Write `bytes` to the asset's destination.
    ///
    /// A destination already holding identical bytes is left alone. Bytes are
    /// written to a sibling temp file and renamed, so the final name never
    /// refers to a partial file.
    pub fn place(&self, asset: &EmittedAsset, bytes: &[u8]) -> Result<PathBuf> {
        let dest = self.destination(asset);

        if is_identical(&dest, bytes) {
            return Ok(dest);
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| RebaseError::write(parent, e))?;
        }

        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = dest.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&temp, bytes).map_err(|e| RebaseError::write(&temp, e))?;
        fs::rename(&temp, &dest).map_err(|e| {
            let _ = fs::remove_file(&temp);
            RebaseError::write(&dest, e)
        })?;

        Ok(dest)
    }
}

/// Check whether `path` exists with exactly `bytes` as content.
fn is_identical(path: &Path, bytes: &[u8]) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == bytes.len() as u64 => {
            fs::read(path).is_ok_and(|existing| existing == bytes)
        }
        _ => false,
    }
}

/// Keep filename stems URL-safe: anything outside `[A-Za-z0-9._-]` becomes `-`.
fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
