//! Reference rewriting: replacement text and span splicing.
//!
//! Only the specifier between the quotes (or inside `url()`) is replaced.
//! Everything around it is copied through byte for byte.

use std::ops::Range;
use std::path::Path;

use crate::utils::path::{relative_to, to_slash};

use super::SourceKind;

/// One pending replacement in a referencing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

/// Specifier pointing from `from_dir` (where the rewritten file is emitted)
/// to `target` (where the asset was placed).
///
/// Script specifiers always start with `./` or `../` so the host treats them
/// as paths, not packages. Stylesheet references stay bare (`a.woff`).
pub fn relative_specifier(from_dir: &Path, target: &Path, kind: SourceKind) -> String {
    let rel = to_slash(&relative_to(target, from_dir));
    match kind {
        SourceKind::Script if !rel.starts_with("../") => format!("./{rel}"),
        _ => rel,
    }
}

/// Apply non-overlapping edits to `text`.
///
/// Edits are applied back to front so earlier spans stay valid. Overlapping
/// edits after the first are dropped.
pub fn splice(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| e.span.start);
    edits.dedup_by(|later, earlier| later.span.start < earlier.span.end);

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        out.replace_range(edit.span, &edit.replacement);
    }
    out
}
