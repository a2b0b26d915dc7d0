//! Discovery of pages missing from the navigation tree.
//!
//! Pages listed in the site manifest but absent from the [`NavTree`] are
//! synthesized into [`DiscoveredEntry`] values. The tree itself is never
//! modified; entries are rendered in a trailing section of their own.
//!
//! When the manifest cannot be used (none configured, missing, unreachable,
//! malformed), discovery degrades to self-detection: only the current page is
//! checked. Manifest failures never propagate to the caller.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::manifest::{Manifest, ManifestSource};
use crate::nav::NavTree;
use crate::page::{DEFAULT_PAGE_SUFFIX, friendly_name, is_page};

/// Discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Whether unlisted pages are discovered at all.
    pub enabled: bool,
    /// Manifest locator (path or URL), if any.
    pub manifest: Option<String>,
    /// Pages never discovered (exact match).
    pub excluded: BTreeSet<String>,
    /// Title of the trailing section holding discovered pages.
    pub section_title: String,
    /// Whether discovered links carry a "New" badge.
    pub show_badge: bool,
    /// Order discovered pages by display name instead of manifest order.
    pub sort: bool,
    /// Suffix an identifier needs to count as a page.
    pub page_suffix: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            manifest: None,
            excluded: BTreeSet::new(),
            section_title: "Other Pages".to_owned(),
            show_badge: true,
            sort: false,
            page_suffix: DEFAULT_PAGE_SUFFIX.to_owned(),
        }
    }
}

/// Synthesized navigation entry for an unlisted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredEntry {
    /// Display name derived from the identifier.
    pub name: String,
    /// Page identifier.
    pub href: String,
    /// Always `true`; distinguishes synthesized entries from configured ones.
    pub is_auto_detected: bool,
}

impl DiscoveredEntry {
    /// Create an entry for a page identifier.
    #[must_use]
    pub fn new(href: &str, page_suffix: &str) -> Self {
        Self {
            name: friendly_name(href, page_suffix),
            href: href.to_owned(),
            is_auto_detected: true,
        }
    }
}

/// Compute entries for pages that exist but are not in `tree`.
///
/// Returns immediately when discovery is disabled. Otherwise fetches the
/// manifest from `source`; on any failure falls back to checking
/// `current_page` alone.
pub async fn discover<S: ManifestSource>(
    tree: &NavTree,
    config: &DiscoveryConfig,
    current_page: &str,
    source: Option<&S>,
) -> Vec<DiscoveredEntry> {
    if !config.enabled {
        return Vec::new();
    }

    let listed = tree.listed_pages();

    match source {
        Some(source) => match source.fetch().await {
            Ok(manifest) => return from_manifest(&manifest, &listed, config),
            Err(e) => {
                tracing::debug!(error = %e, "Manifest unavailable, falling back to self-detection");
            }
        },
        None => tracing::debug!("No manifest configured, falling back to self-detection"),
    }

    self_detect(current_page, &listed, config)
        .into_iter()
        .collect()
}

/// Whether `href` should be offered as a discovered page.
fn is_unlisted_page(href: &str, listed: &HashSet<&str>, config: &DiscoveryConfig) -> bool {
    is_page(href, &config.page_suffix)
        && !listed.contains(href)
        && !config.excluded.contains(href)
}

fn from_manifest(
    manifest: &Manifest,
    listed: &HashSet<&str>,
    config: &DiscoveryConfig,
) -> Vec<DiscoveredEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<_> = manifest
        .pages
        .iter()
        .filter(|href| is_unlisted_page(href, listed, config))
        .filter(|href| seen.insert(href.as_str()))
        .map(|href| DiscoveredEntry::new(href, &config.page_suffix))
        .collect();

    if config.sort {
        entries.sort_by(|a, b| compare_names(&a.name, &b.name));
    }

    tracing::debug!(
        manifest_pages = manifest.pages.len(),
        discovered = entries.len(),
        "Discovered unlisted pages from manifest"
    );
    entries
}

fn self_detect(
    current_page: &str,
    listed: &HashSet<&str>,
    config: &DiscoveryConfig,
) -> Option<DiscoveredEntry> {
    is_unlisted_page(current_page, listed, config)
        .then(|| DiscoveredEntry::new(current_page, &config.page_suffix))
}

/// Locale-style name ordering.
///
/// Names are compared on a folded key (NFD, combining marks stripped,
/// lowercased), so accents and case only break ties: unaccented before
/// accented, then lowercase before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
