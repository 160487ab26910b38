//! A single asset reference found while scanning a referencing file.

use std::ops::Range;
use std::path::Path;

use crate::utils::path::split_suffix;

use super::SourceKind;

/// Candidate reference located in a script or stylesheet.
///
/// Borrowed from the scanned text and consumed immediately by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference<'a> {
    /// Specifier exactly as written, including any `?query` or `#fragment`.
    pub specifier: &'a str,
    /// Byte span of `specifier` inside the scanned text (quotes excluded).
    pub span: Range<usize>,
    /// Absolute path of the file containing the reference.
    pub referencing: &'a Path,
    pub kind: SourceKind,
}

impl<'a> AssetReference<'a> {
    /// Path portion used for resolution.
    pub fn path(&self) -> &'a str {
        split_suffix(self.specifier).0
    }

    /// `?query`/`#fragment` tail, re-appended after rewriting.
    pub fn suffix(&self) -> &'a str {
        split_suffix(self.specifier).1
    }
}
