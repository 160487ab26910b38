//! Per-file rebasing pipeline.
//!
//! The host bundler creates one [`Build`] per build invocation and hands it
//! every referencing file it wants rebased:
//!
//! ```text
//! Build::new(config)                       registry created, output dir ready
//!   ├── process_file(a.js, text)           ─┐
//!   ├── process_file(b.js, text)            ├─ may run concurrently
//!   └── process_file(theme.css, text)      ─┘
//! Build::finish()                          registry dropped, report returned
//! ```
//!
//! Every asset reached from a file is placed on disk before that file's
//! rewritten text is returned, so emitted text never points at a missing file.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::asset::{
    AssetRegistry, Edit, EmittedAsset, Emitter, ImportStack, OutputPlacer, PathResolver,
    SourceKind, relative_specifier, rewrite_stylesheet, scan_script, splice,
};
use crate::config::RebaseConfig;
use crate::debug;
use crate::error::{RebaseError, Result};
use crate::utils::path::{clean_path, normalize_path};

// =============================================================================
// Types
// =============================================================================

/// Rewritten referencing file.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// File text with every local asset reference pointing at its emitted copy.
    pub code: String,
    /// Assets referenced directly by the file, in first-reference order.
    pub assets: Vec<EmittedAsset>,
}

/// Everything one build emitted.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Sorted by output path.
    pub assets: Vec<EmittedAsset>,
}

/// A single build: resolver, registry and script scanning settings.
///
/// Shareable across threads; all mutation goes through the registry.
#[derive(Debug)]
pub struct Build {
    resolver: PathResolver,
    registry: AssetRegistry,
    extensions: FxHashSet<String>,
}

// =============================================================================
// Build
// =============================================================================

impl Build {
    /// Start a build, creating the output directory if needed.
    ///
    /// `config` paths are expected to be normalized (see
    /// [`RebaseConfig::normalize`]).
    pub fn new(config: &RebaseConfig) -> Result<Self> {
        fs::create_dir_all(&config.output).map_err(|e| RebaseError::write(&config.output, e))?;
        let output_dir = normalize_path(&config.output);

        Ok(Self {
            resolver: PathResolver::new(normalize_path(&config.root)),
            registry: AssetRegistry::new(OutputPlacer::new(
                output_dir,
                &config.folder,
                config.naming(),
            )),
            extensions: config.extensions(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.registry.placer().output_dir()
    }

    /// Rebase the file at `source`, assuming its rewritten text is emitted
    /// directly in the output directory under the same file name.
    pub fn process_file(&self, source: &Path, text: &str) -> Result<RewriteResult> {
        let bundle = source.file_name().map(PathBuf::from).unwrap_or_default();
        self.process_file_as(source, text, &bundle)
    }

    /// Rebase the file at `source` whose rewritten text will be emitted at
    /// `bundle` (relative to the output directory, e.g. `js/index.js`).
    ///
    /// Scripts have their asset imports rewritten; stylesheets have their
    /// `url()`/`@import` references rewritten. Replacements are relative to
    /// the bundle's directory.
    ///
    /// # Errors
    ///
    /// The first fatal error aborts the file: an unresolved reference, a token
    /// collision, or a failed read/write.
    pub fn process_file_as(&self, source: &Path, text: &str, bundle: &Path) -> Result<RewriteResult> {
        let source = normalize_path(source);
        let bundle_path = clean_path(&self.output_dir().join(bundle));
        let bundle_dir = bundle_path.parent().unwrap_or(self.output_dir());
        let emitter = Emitter::new(&self.resolver, &self.registry);

        let result = match SourceKind::from_path(&source) {
            SourceKind::Script => self.rewrite_script(&emitter, &source, text, bundle_dir)?,
            SourceKind::Stylesheet => {
                // Only a direct self-reference can loop back into the entry text
                let mut stack = ImportStack::default();
                stack.enter(&source);
                let (code, assets) = rewrite_stylesheet(
                    &emitter,
                    text,
                    &source,
                    bundle_dir,
                    &mut stack,
                    &FxHashSet::default(),
                )?;
                RewriteResult { code, assets }
            }
        };

        debug!(
            "build";
            "{} -> {} ({} assets)",
            source.display(),
            bundle.display(),
            result.assets.len()
        );
        Ok(result)
    }

    fn rewrite_script(
        &self,
        emitter: &Emitter<'_>,
        source: &Path,
        text: &str,
        bundle_dir: &Path,
    ) -> Result<RewriteResult> {
        let refs = scan_script(text, source, &self.extensions);
        let mut edits = Vec::with_capacity(refs.len());
        let mut assets: Vec<EmittedAsset> = Vec::new();

        for reference in &refs {
            let target = self.resolver.resolve(reference.specifier, source)?;
            // A script is never on the import stack, so emission always yields an asset
            let Some(emitted) = emitter.emit(&target, &mut ImportStack::default())? else {
                continue;
            };

            let dest = emitter.placer().destination(&emitted);
            edits.push(Edit {
                span: reference.span.clone(),
                replacement: format!(
                    "{}{}",
                    relative_specifier(bundle_dir, &dest, SourceKind::Script),
                    reference.suffix()
                ),
            });

            if !assets.contains(&emitted) {
                assets.push(emitted);
            }
        }

        Ok(RewriteResult {
            code: splice(text, edits),
            assets,
        })
    }

    /// Assets emitted so far, sorted by output path.
    pub fn emitted(&self) -> Vec<EmittedAsset> {
        self.registry.emitted()
    }

    /// End the build. The registry is dropped; nothing carries over.
    pub fn finish(self) -> BuildReport {
        let output_dir = self.output_dir().to_path_buf();
        BuildReport {
            output_dir,
            assets: self.registry.into_emitted(),
        }
    }
}

#[cfg(test)]
mod tests;
