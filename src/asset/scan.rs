//! Script scanning (pure, no side effects).
//!
//! Finds module specifiers in a script that name asset files:
//!
//! ```text
//! import logo from "./logo.png"        static import
//! import "./theme.css"                  side-effect import
//! export { default } from "./a.svg"     re-export
//! const f = import("./font.woff")       dynamic import
//! require('../img/bg.jpg')              CommonJS
//! ```
//!
//! Only path-like specifiers (`./`, `../`, `/`) whose extension is in the
//! asset set are returned; package imports and `.js` modules are left to the
//! host bundler. Imports inside `// line` and `/* block */` comments are
//! ignored.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::core::LinkKind;

use super::{AssetReference, SourceKind};

static SCRIPT_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:\bfrom\s*|\b(?:import|require)\s*(?:\(\s*)?)(?:"([^"\r\n]+)"|'([^'\r\n]+)')"#,
    )
    .unwrap()
});

/// String literals and comments, matched together so `"https://a"` is not
/// mistaken for a comment and `// don't` does not open a string.
static SCRIPT_TRIVIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""(?:[^"\\\r\n]|\\.)*"|'(?:[^'\\\r\n]|\\.)*'|`(?:[^`\\]|\\(?s:.))*`|//[^\r\n]*|/\*(?s:.*?)\*/"#,
    )
    .unwrap()
});

/// Byte ranges of comments in `text`.
fn comment_ranges(text: &str) -> Vec<Range<usize>> {
    SCRIPT_TRIVIA
        .find_iter(text)
        .filter(|m| m.as_str().starts_with('/'))
        .map(|m| m.range())
        .collect()
}

/// Scan `text` of the script at `path` for asset specifiers.
///
/// `extensions` holds lowercase extensions without the dot.
pub fn scan_script<'a>(
    text: &'a str,
    path: &'a Path,
    extensions: &FxHashSet<String>,
) -> Vec<AssetReference<'a>> {
    let comments = comment_ranges(text);
    let in_comment = |pos: usize| comments.iter().any(|c| c.contains(&pos));

    SCRIPT_SPECIFIER
        .captures_iter(text)
        .filter(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            // `Array.from('x.png')` is a method call, not an import
            !in_comment(start) && !text[..start].ends_with('.')
        })
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter(|m| LinkKind::is_path_like(m.as_str()))
        .map(|m| AssetReference {
            specifier: m.as_str(),
            span: m.range(),
            referencing: path,
            kind: SourceKind::Script,
        })
        .filter(|r| has_asset_extension(r.path(), extensions))
        .collect()
}

/// Whether the path part of a specifier ends in one of `extensions`.
fn has_asset_extension(path: &str, extensions: &FxHashSet<String>) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}
