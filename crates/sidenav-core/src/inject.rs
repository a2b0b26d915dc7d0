//! Host document injection.
//!
//! The sidebar is inserted immediately before the element carrying the
//! main-content class. Supporting assets go in once per document:
//!
//! - `<style id="sidenav-styles">` before `</head>`
//! - `<script id="sidenav-script">` before `</body>`
//!
//! The sidebar itself is wrapped in start/end comment markers. Injecting into
//! a document that already has a sidebar replaces it, so repeated runs never
//! stack sidebars or asset blocks.

use std::ops::Range;

use regex::Regex;

use crate::interaction::BINDING_SCRIPT;
use crate::render::STYLESHEET;

/// Comment opening an injected sidebar.
pub const START_MARKER: &str = "<!-- sidenav:start -->";

/// Comment closing an injected sidebar.
pub const END_MARKER: &str = "<!-- sidenav:end -->";

const STYLE_ID: &str = "sidenav-styles";
const SCRIPT_ID: &str = "sidenav-script";

/// Outcome of an injection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Updated document.
    Injected(String),
    /// No main-content element; the document is left alone.
    AnchorMissing,
}

/// Locates the main-content element in a document.
#[derive(Debug, Clone)]
pub struct Anchor {
    class: String,
    pattern: Regex,
    inert: Regex,
}

impl Anchor {
    /// Match the first element whose `class` attribute contains `class` as a
    /// whole token. Quoted and unquoted attribute values are accepted; tags
    /// inside comments and `<script>` bodies are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`regex::Error`] if the pattern exceeds the regex size limit.
    pub fn new(class: &str) -> Result<Self, regex::Error> {
        let token = regex::escape(class);
        let pattern = Regex::new(&format!(
            r#"<[A-Za-z][A-Za-z0-9-]*[^>]*?\sclass\s*=\s*(?:"(?:[^"]*\s)?{token}(?:\s[^"]*)?"[^>]*|'(?:[^']*\s)?{token}(?:\s[^']*)?'[^>]*|{token}(?:\s[^>]*)?)>"#
        ))?;
        let inert = Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>")?;
        Ok(Self {
            class: class.to_owned(),
            pattern,
            inert,
        })
    }

    /// Byte offset of the anchor element's opening tag.
    #[must_use]
    pub fn find(&self, document: &str) -> Option<usize> {
        let inert: Vec<Range<usize>> = self.inert.find_iter(document).map(|m| m.range()).collect();
        let mut matches = self
            .pattern
            .find_iter(document)
            .map(|m| m.start())
            .filter(|start| !inert.iter().any(|span| span.contains(start)));

        let first = matches.next()?;
        if matches.next().is_some() {
            tracing::warn!(
                class = %self.class,
                "Multiple main-content elements found, using the first"
            );
        }
        Some(first)
    }
}

/// Insert `fragment` before the anchor and ensure assets are present.
#[must_use]
pub fn inject(document: &str, fragment: &str, anchor: &Anchor) -> Injection {
    let mut html = remove_sidebar(document);

    let Some(offset) = anchor.find(&html) else {
        tracing::warn!(class = %anchor.class, "No main-content element, skipping sidebar");
        return Injection::AnchorMissing;
    };

    let mut block = String::with_capacity(fragment.len() + 64);
    block.push_str(START_MARKER);
    block.push('\n');
    block.push_str(fragment);
    if !fragment.ends_with('\n') {
        block.push('\n');
    }
    block.push_str(END_MARKER);
    block.push('\n');
    html.insert_str(offset, &block);

    if !html.contains(&format!("id=\"{STYLE_ID}\"")) {
        let style = format!("<style id=\"{STYLE_ID}\">\n{STYLESHEET}</style>\n");
        // Without a head, styles go right before the sidebar
        let at = closing_tags(&html, "head").first().copied().unwrap_or(offset);
        html.insert_str(at, &style);
    }

    if !html.contains(&format!("id=\"{SCRIPT_ID}\"")) {
        let script = format!("<script id=\"{SCRIPT_ID}\">\n{BINDING_SCRIPT}\n</script>\n");
        let at = closing_tags(&html, "body").last().copied().unwrap_or(html.len());
        html.insert_str(at, &script);
    }

    Injection::Injected(html)
}

/// Drop a previously injected sidebar, markers included.
fn remove_sidebar(document: &str) -> String {
    let Some(start) = document.find(START_MARKER) else {
        return document.to_owned();
    };
    let Some(end) = document[start..].find(END_MARKER).map(|i| start + i) else {
        return document.to_owned();
    };

    let mut end = end + END_MARKER.len();
    if document[end..].starts_with('\n') {
        end += 1;
    }

    let mut html = String::with_capacity(document.len());
    html.push_str(&document[..start]);
    html.push_str(&document[end..]);
    html
}

/// Offsets of whole `</tag>` closing tags (ASCII case-insensitive).
///
/// `</head>` matches, `</header>` does not.
fn closing_tags(html: &str, tag: &str) -> Vec<usize> {
    let needle = format!("</{tag}");
    let lower = html.to_ascii_lowercase();
    lower
        .match_indices(&needle)
        .map(|(at, _)| at)
        .filter(|at| {
            lower[at + needle.len()..].starts_with(|c: char| c == '>' || c.is_ascii_whitespace())
        })
        .collect()
}
