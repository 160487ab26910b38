//! Emission of a resolved file, recursing through stylesheets.

use std::fs;
use std::path::Path;

use crate::error::{RebaseError, Result};

use super::css::{ImportStack, cycle_group, rewrite_stylesheet};
use super::hash::address;
use super::{AssetKind, AssetRegistry, EmittedAsset, OutputPlacer, PathResolver};

/// Turns resolved paths into emitted assets.
///
/// Binary files are copied as-is. Stylesheets are rewritten first, so their
/// nested assets are placed before the stylesheet that points at them, and the
/// stylesheet is addressed by its rewritten bytes.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    resolver: &'a PathResolver,
    registry: &'a AssetRegistry,
}

impl<'a> Emitter<'a> {
    pub fn new(resolver: &'a PathResolver, registry: &'a AssetRegistry) -> Self {
        Self { resolver, registry }
    }

    pub fn resolver(&self) -> &'a PathResolver {
        self.resolver
    }

    pub fn placer(&self) -> &'a OutputPlacer {
        self.registry.placer()
    }

    /// Emit the file at `path` (absolute, canonical).
    ///
    /// Returns `None` only when `path` is a stylesheet already on `stack`.
    pub fn emit(&self, path: &Path, stack: &mut ImportStack) -> Result<Option<EmittedAsset>> {
        if let Some(done) = self.registry.lookup(path) {
            return Ok(Some(done));
        }

        match AssetKind::from_path(path) {
            AssetKind::Binary => {
                let bytes = fs::read(path).map_err(|e| RebaseError::read(path, e))?;
                self.registry.register(address(path, &bytes), &bytes).map(Some)
            }
            AssetKind::Stylesheet => {
                if !stack.enter(path) {
                    return Ok(None);
                }
                let emitted = self.emit_stylesheet(path, stack);
                stack.leave(path);
                emitted.map(Some)
            }
        }
    }

    fn emit_stylesheet(&self, path: &Path, stack: &mut ImportStack) -> Result<EmittedAsset> {
        let text = read_text(path)?;
        let cycle = cycle_group(self.resolver, path)?;
        let asset_dir = self.placer().asset_dir();
        let (rewritten, _) = rewrite_stylesheet(self, &text, path, &asset_dir, stack, &cycle)?;
        let bytes = rewritten.as_bytes();
        self.registry.register(address(path, bytes), bytes)
    }
}

/// Read a UTF-8 text file, mapping failures to [`RebaseError::Read`].
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| RebaseError::read(path, e))?;
    String::from_utf8(bytes).map_err(|e| {
        RebaseError::read(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
