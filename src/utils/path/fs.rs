//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + lexical fallback)
//! - `clean_path` - lexical `.`/`..` removal for paths that may not exist yet
//! - `relative_to` - lexical difference between two absolute paths

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Lexically cleaned path if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            clean_path(path)
        } else {
            std::env::current_dir()
                .map_or_else(|_| clean_path(path), |cwd| clean_path(&cwd.join(path)))
        }
    })
}

/// Remove `.` components and fold `..` into their parent, without touching disk.
///
/// `..` at the root is dropped, so `/a/../../b` becomes `/b`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() && !path.has_root() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Path of `target` as seen from directory `base`.
///
/// Both paths should be absolute and clean; the result contains only
/// `..` and normal components.
///
/// # Example
/// ```ignore
/// let rel = relative_to(Path::new("/out/static/a.png"), Path::new("/out/js"));
/// assert_eq!(rel, PathBuf::from("../static/a.png"));
/// ```
pub fn relative_to(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();

    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for comp in &target[common..] {
        rel.push(comp.as_os_str());
    }
    rel
}

/// Render a relative path with forward slashes regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
