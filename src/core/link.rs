//! Specifier classification.
//!
//! Decides whether a reference found in a script or stylesheet names a local
//! file that must be rebased, or something that passes through untouched.

use crate::utils::path::is_external_link;

/// Syntactic classification of an asset specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// URL with a scheme (https:, data:, blob:, ...)
    External(&'a str),
    /// Protocol-relative URL (`//cdn.example.com/a.woff`)
    ProtocolRelative(&'a str),
    /// Fragment-only reference (`#mask`). Value is the fragment without `#`.
    Fragment(&'a str),
    /// Empty or whitespace-only specifier, e.g. `url()`
    Empty,
    /// Rooted path (`/img/logo.png`), resolved against the source root.
    Rooted(&'a str),
    /// File-relative path (`./a.png`, `../fonts/b.woff`, `c.gif`).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a specifier into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        let link = link.trim();
        if link.is_empty() {
            Self::Empty
        } else if is_external_link(link) {
            Self::External(link)
        } else if link.starts_with("//") {
            Self::ProtocolRelative(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::Rooted(link)
        } else {
            Self::Relative(link)
        }
    }

    /// Whether the specifier names a file on disk.
    #[inline]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Rooted(_) | Self::Relative(_))
    }

    /// Check if a specifier is explicitly path-like (`./`, `../` or `/`).
    ///
    /// Script imports without one of these prefixes are package imports that
    /// the host bundler resolves, never assets.
    #[inline]
    pub fn is_path_like(link: &str) -> bool {
        link.starts_with("./")
            || link.starts_with("../")
            || (link.starts_with('/') && !link.starts_with("//"))
    }
}
