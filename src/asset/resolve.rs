//! Specifier → absolute file path resolution.
//!
//! Relative specifiers resolve against the directory of the file that
//! contains them, wherever that file lives. Only rooted specifiers (`/img/a.png`)
//! look at the configured source root.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::core::LinkKind;
use crate::error::{RebaseError, Result};
use crate::utils::path::{clean_path, normalize_path, split_suffix};

/// Resolves asset specifiers to files on disk.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Source root for rooted specifiers (absolute).
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `specifier` found in `referencing` to an existing file.
    ///
    /// Any `?query`/`#fragment` is ignored and `%XX` escapes are decoded.
    /// The result is canonical, so two specifiers reaching the same file
    /// resolve to the same path.
    ///
    /// # Errors
    ///
    /// [`RebaseError::UnresolvedAsset`] if no file exists at the target.
    pub fn resolve(&self, specifier: &str, referencing: &Path) -> Result<PathBuf> {
        let (path, _) = split_suffix(specifier.trim());
        let decoded = percent_decode_str(path).decode_utf8_lossy();

        let candidate = match LinkKind::parse(&decoded) {
            LinkKind::Rooted(rooted) => join_specifier(&self.root, rooted.trim_start_matches('/')),
            _ => {
                let base = referencing.parent().unwrap_or_else(|| Path::new(""));
                join_specifier(base, &decoded)
            }
        };

        if candidate.is_file() {
            Ok(normalize_path(&candidate))
        } else {
            Err(RebaseError::UnresolvedAsset {
                referencing: referencing.to_path_buf(),
                specifier: specifier.to_string(),
                attempted: candidate,
            })
        }
    }
}

/// Join a `/`-separated relative specifier onto a base directory.
///
/// `..` may climb above `base`; assets outside the source root are legal.
fn join_specifier(base: &Path, rel: &str) -> PathBuf {
    let mut result = base.to_path_buf();
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if !result.pop() {
                    result.push("..");
                }
            }
            _ => result.push(part),
        }
    }
    clean_path(&result)
}
