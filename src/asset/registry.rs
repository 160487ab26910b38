//! Build-scoped deduplicating asset store.
//!
//! Maps content tokens (and, as a shortcut, source paths) to emitted assets.
//! Registration is one critical section: check token → place bytes → record.
//! Two files discovering the same new content concurrently end up with one
//! output file and one canonical [`EmittedAsset`].

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::debug;
use crate::error::{RebaseError, Result};

use super::{OutputPlacer, ResolvedAsset};

/// An asset written to the output tree. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    /// The first asset registered with this content.
    pub resolved: ResolvedAsset,
    /// Path under the output directory, `/`-separated (e.g. `static/3f2a9c1e.png`).
    pub output_path: String,
}

/// Deduplicating registry, created per build and dropped with it.
#[derive(Debug)]
pub struct AssetRegistry {
    placer: OutputPlacer,
    /// Case-folded token → emitted asset. Guards registration.
    by_token: Mutex<FxHashMap<String, EmittedAsset>>,
    /// source path → emitted asset, read without taking the registration lock.
    by_path: DashMap<PathBuf, EmittedAsset>,
}

impl AssetRegistry {
    pub fn new(placer: OutputPlacer) -> Self {
        Self {
            placer,
            by_token: Mutex::new(FxHashMap::default()),
            by_path: DashMap::new(),
        }
    }

    pub fn placer(&self) -> &OutputPlacer {
        &self.placer
    }

    /// Asset already emitted for `path`, if any. Lets callers skip re-reading
    /// and re-hashing a file registered earlier in the build.
    pub fn lookup(&self, path: &Path) -> Option<EmittedAsset> {
        self.by_path.get(path).map(|entry| entry.value().clone())
    }

    /// Register `asset`, writing `bytes` only on the first sighting of its token.
    ///
    /// # Errors
    ///
    /// - [`RebaseError::HashCollision`] if the token is already taken by
    ///   different content. Tokens are compared ignoring ASCII case, since
    ///   output names must stay distinct on case-insensitive filesystems.
    /// - [`RebaseError::Write`] if placing the bytes fails; nothing is recorded.
    pub fn register(&self, asset: ResolvedAsset, bytes: &[u8]) -> Result<EmittedAsset> {
        let source = asset.path.clone();
        let key = asset.token.to_ascii_lowercase();

        let emitted = {
            let mut tokens = self.by_token.lock();
            match tokens.get(&key) {
                Some(existing) if existing.resolved.hash == asset.hash => existing.clone(),
                Some(existing) => {
                    return Err(RebaseError::HashCollision {
                        token: asset.token,
                        first: existing.resolved.path.clone(),
                        second: asset.path,
                    });
                }
                None => {
                    let emitted = EmittedAsset {
                        output_path: self.placer.allocate(&asset),
                        resolved: asset,
                    };
                    self.placer.place(&emitted, bytes)?;
                    debug!(
                        "asset";
                        "{} -> {}",
                        emitted.resolved.path.display(),
                        emitted.output_path
                    );
                    tokens.insert(key, emitted.clone());
                    emitted
                }
            }
        };

        self.by_path.insert(source, emitted.clone());
        Ok(emitted)
    }

    /// Number of distinct emitted files.
    pub fn len(&self) -> usize {
        self.by_token.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All emitted assets, sorted by output path.
    pub fn emitted(&self) -> Vec<EmittedAsset> {
        let mut assets: Vec<_> = self.by_token.lock().values().cloned().collect();
        assets.sort_by(|a, b| a.output_path.cmp(&b.output_path));
        assets
    }

    /// Consume the registry, returning everything it emitted.
    pub fn into_emitted(self) -> Vec<EmittedAsset> {
        let mut assets: Vec<_> = self.by_token.into_inner().into_values().collect();
        assets.sort_by(|a, b| a.output_path.cmp(&b.output_path));
        assets
    }
}
