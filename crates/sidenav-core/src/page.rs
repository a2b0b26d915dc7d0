//! Page identifiers.
//!
//! A page identifier is the final path segment of a page location
//! (`/docs/components/buttons.html` → `buttons.html`). Navigation hrefs,
//! manifest entries and the current page are all compared in this form.

/// Default entry page used when a location names a directory.
pub const DEFAULT_PAGE: &str = "index.html";

/// Default suffix marking an identifier as a page.
pub const DEFAULT_PAGE_SUFFIX: &str = ".html";

/// Resolve the current page identifier from a location path.
///
/// Takes the final `/`-separated segment, ignoring any query string or
/// fragment. A location ending in `/` (or an empty one) resolves to
/// `default_page`.
///
/// # Example
///
/// ```
/// use sidenav_core::current_page;
///
/// assert_eq!(current_page("/a/b/c.html", "index.html"), "c.html");
/// assert_eq!(current_page("/docs/", "index.html"), "index.html");
/// ```
#[must_use]
pub fn current_page(location: &str, default_page: &str) -> String {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_owned(),
        _ => default_page.to_owned(),
    }
}

/// Whether an identifier names a page by suffix convention.
#[must_use]
pub fn is_page(identifier: &str, page_suffix: &str) -> bool {
    identifier.len() > page_suffix.len() && identifier.ends_with(page_suffix)
}

/// Derive a display name from a page identifier.
///
/// Strips the page suffix, splits on hyphens and capitalizes the first
/// character of each word.
///
/// # Example
///
/// ```
/// use sidenav_core::friendly_name;
///
/// assert_eq!(friendly_name("status-indicators.html", ".html"), "Status Indicators");
/// ```
#[must_use]
pub fn friendly_name(identifier: &str, page_suffix: &str) -> String {
    let stem = identifier.strip_suffix(page_suffix).unwrap_or(identifier);

    stem.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
