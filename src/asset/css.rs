//! Stylesheet scanning and rewriting.
//!
//! Recognised reference syntax:
//!
//! ```text
//! url(a.png)  url('a.png')  url("a.png")
//! @import "b.css";  @import 'b.css';  @import url(b.css);
//! ```
//!
//! References inside `/* comments */`, data URIs, remote and
//! protocol-relative URLs, fragment-only `url(#id)` and empty `url()` pass
//! through untouched.
//!
//! Stylesheets that import each other form a cycle group. References between
//! members of one group are left as written, so each member's rewritten text
//! (and therefore its token) is the same whichever member is reached first:
//!
//! ```text
//! a.css ──@import──► b.css ──@import──► a.css     group {a, b}
//!   └──url()──► font.woff                         rewritten
//! ```

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::LinkKind;
use crate::error::Result;
use crate::log;

use super::emit::{Emitter, read_text};
use super::rewrite::{Edit, relative_specifier, splice};
use super::{AssetKind, AssetReference, EmittedAsset, PathResolver, SourceKind};

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\burl\(\s*(?:"([^"]*)"|'([^']*)'|([^\s'"()]*))\s*\)"#).unwrap()
});

static CSS_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)@import\s+(?:"([^"]*)"|'([^']*)')"#).unwrap());

static CSS_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Stylesheets currently being rewritten.
///
/// Visited set of absolute paths passed down the recursion. Cycle groups keep
/// recursion from ever re-entering an open stylesheet; the stack still stops
/// it if the files change between the group walk and the rewrite.
#[derive(Debug, Default)]
pub struct ImportStack {
    open: FxHashSet<PathBuf>,
}

impl ImportStack {
    /// Push `path`. Returns `false` if it is already open.
    pub fn enter(&mut self, path: &Path) -> bool {
        self.open.insert(path.to_path_buf())
    }

    pub fn leave(&mut self, path: &Path) {
        self.open.remove(path);
    }
}

/// The cycle group of the stylesheet at `path`: every stylesheet it reaches
/// through `url()`/`@import` that also reaches it back, plus `path` itself.
///
/// Unresolvable references are skipped here; rewriting reports them.
pub fn cycle_group(resolver: &PathResolver, path: &Path) -> Result<FxHashSet<PathBuf>> {
    // Forward walk: stylesheet edges of everything reachable from `path`
    let mut edges: FxHashMap<PathBuf, Vec<PathBuf>> = FxHashMap::default();
    let mut pending = vec![path.to_path_buf()];
    while let Some(sheet) = pending.pop() {
        if edges.contains_key(&sheet) {
            continue;
        }
        let text = read_text(&sheet)?;
        let targets: Vec<PathBuf> = scan_stylesheet(&text, &sheet)
            .into_iter()
            .filter_map(|r| resolver.resolve(r.specifier, &sheet).ok())
            .filter(|t| AssetKind::from_path(t) == AssetKind::Stylesheet)
            .collect();
        pending.extend(targets.iter().cloned());
        edges.insert(sheet, targets);
    }

    // Backward closure: reachable sheets with an edge into the group
    let mut group = FxHashSet::default();
    group.insert(path.to_path_buf());
    let mut grew = true;
    while grew {
        grew = false;
        for (sheet, targets) in &edges {
            if !group.contains(sheet) && targets.iter().any(|t| group.contains(t)) {
                group.insert(sheet.clone());
                grew = true;
            }
        }
    }
    Ok(group)
}

/// Find local file references in stylesheet `text`, in source order.
pub fn scan_stylesheet<'a>(text: &'a str, path: &'a Path) -> Vec<AssetReference<'a>> {
    let comments: Vec<Range<usize>> = CSS_COMMENT.find_iter(text).map(|m| m.range()).collect();
    let in_comment = |pos: usize| comments.iter().any(|c| c.contains(&pos));

    let urls = CSS_URL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)));
    let imports = CSS_IMPORT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)));

    let mut refs: Vec<AssetReference<'a>> = urls
        .chain(imports)
        .filter(|m| !in_comment(m.start()))
        .filter(|m| LinkKind::parse(m.as_str()).is_local())
        .map(|m| AssetReference {
            specifier: m.as_str(),
            span: m.range(),
            referencing: path,
            kind: SourceKind::Stylesheet,
        })
        .collect();

    refs.sort_by_key(|r| r.span.start);
    refs
}

/// Rewrite every local reference in the stylesheet at `path`.
///
/// `out_dir` is where the rewritten text will be emitted; replacements are
/// relative to it. Each reference is resolved relative to `path` itself and
/// emitted (recursing into nested stylesheets) before its replacement is
/// spliced in. References into `cycle` (see [`cycle_group`]) are left as
/// written. Returns the rewritten text and the assets it references directly.
pub fn rewrite_stylesheet(
    emitter: &Emitter<'_>,
    text: &str,
    path: &Path,
    out_dir: &Path,
    stack: &mut ImportStack,
    cycle: &FxHashSet<PathBuf>,
) -> Result<(String, Vec<EmittedAsset>)> {
    let refs = scan_stylesheet(text, path);
    let mut edits = Vec::with_capacity(refs.len());
    let mut nested: Vec<EmittedAsset> = Vec::new();

    for reference in &refs {
        let target = emitter.resolver().resolve(reference.specifier, path)?;

        let emitted = if cycle.contains(&target) {
            None
        } else {
            emitter.emit(&target, stack)?
        };
        let Some(emitted) = emitted else {
            log!(
                "warning";
                "cyclic import `{}` in {}, left unchanged",
                reference.specifier,
                path.display()
            );
            continue;
        };

        let dest = emitter.placer().destination(&emitted);
        edits.push(Edit {
            span: reference.span.clone(),
            replacement: format!(
                "{}{}",
                relative_specifier(out_dir, &dest, SourceKind::Stylesheet),
                reference.suffix()
            ),
        });

        if !nested.contains(&emitted) {
            nested.push(emitted);
        }
    }

    Ok((splice(text, edits), nested))
}
