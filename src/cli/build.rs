//! `rebase build`: rebase entry files into the output directory.
//!
//! Phases:
//! - **Init** - Optional clean, output directory, duplicate-name check
//! - **Rebase** - Entries processed in parallel against one shared registry
//! - **Finalize** - Registry dropped, summary logged

use crate::{
    config::RebaseConfig,
    debug,
    error::RebaseError,
    log,
    pipeline::{Build, BuildReport},
    utils::plural_count,
};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

/// Rebase every entry and write the rewritten text to `output/<file name>`.
///
/// Entry paths are relative to the current directory. All entries share one
/// build, so an asset referenced from several entries is emitted once.
pub fn build_entries(config: &RebaseConfig, entries: &[PathBuf], clean: bool) -> Result<BuildReport> {
    let started = Instant::now();
    init_output(config, clean)?;
    check_entry_names(entries)?;

    let build = Build::new(config)?;
    let written: Vec<PathBuf> = entries
        .par_iter()
        .map(|entry| rebase_entry(&build, entry))
        .collect::<Result<Vec<_>>>()?;

    let report = build.finish();
    log!(
        "build";
        "{} rebased, {} emitted in {:.2?}",
        plural_count(written.len(), "file"),
        plural_count(report.assets.len(), "asset"),
        started.elapsed()
    );
    Ok(report)
}

/// Clear the output directory when `--clean` is set.
fn init_output(config: &RebaseConfig, clean: bool) -> Result<()> {
    if clean && config.output.exists() {
        fs::remove_dir_all(&config.output)
            .with_context(|| format!("Failed to clean {}", config.output.display()))?;
        debug!("build"; "cleaned {}", config.output.display());
    }
    Ok(())
}

/// Entries are written by file name, so two with the same name would clobber.
fn check_entry_names(entries: &[PathBuf]) -> Result<()> {
    let mut seen: FxHashSet<&OsStr> = FxHashSet::default();
    for entry in entries {
        let Some(name) = entry.file_name() else {
            bail!("entry `{}` has no file name", entry.display());
        };
        if !seen.insert(name) {
            bail!(
                "entries share the file name `{}`; rename one",
                Path::new(name).display()
            );
        }
    }
    Ok(())
}

fn rebase_entry(build: &Build, entry: &Path) -> Result<PathBuf> {
    let text = fs::read_to_string(entry).map_err(|e| RebaseError::read(entry, e))?;
    let result = build
        .process_file(entry, &text)
        .with_context(|| format!("while rebasing {}", entry.display()))?;

    let dest = build
        .output_dir()
        .join(entry.file_name().unwrap_or(entry.as_os_str()));
    fs::write(&dest, &result.code).map_err(|e| RebaseError::write(&dest, e))?;
    debug!(
        "build";
        "{} ({})",
        dest.display(),
        plural_count(result.assets.len(), "asset")
    );
    Ok(dest)
}
