//! Specifier string utilities.
//!
//! - Link type detection (external vs local)
//! - Query/fragment splitting so only the path part is resolved

/// Check if a link is external (has a URL scheme like http:, data:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// # Examples
/// ```
/// use rebase::utils::path::is_external_link;
/// assert!(is_external_link("https://example.com/font.woff"));
/// assert!(is_external_link("data:image/png;base64,AAAA"));
/// assert!(!is_external_link("./image.png"));
/// assert!(!is_external_link("/img/a.png"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Split a specifier into its path and `?query`/`#fragment` suffix.
///
/// The suffix keeps its leading `?` or `#` so it can be re-appended verbatim.
///
/// # Examples
/// ```
/// use rebase::utils::path::split_suffix;
/// assert_eq!(split_suffix("./font.eot?#iefix"), ("./font.eot", "?#iefix"));
/// assert_eq!(split_suffix("./icons.svg#star"), ("./icons.svg", "#star"));
/// assert_eq!(split_suffix("./a.png"), ("./a.png", ""));
/// ```
#[inline]
pub fn split_suffix(specifier: &str) -> (&str, &str) {
    match specifier.find(['?', '#']) {
        Some(pos) => specifier.split_at(pos),
        None => (specifier, ""),
    }
}
