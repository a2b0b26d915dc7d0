//! Sidebar markup.
//!
//! [`render`] turns a tree and its [`RenderState`] into an HTML fragment. It
//! reads nothing besides its arguments, so the same inputs always produce the
//! same markup.
//!
//! Class names are the styling hooks shared with [`STYLESHEET`] and the
//! toggle script: `sidenav-item`, `active`, `expanded`, `sidenav-children`...

use std::fmt::Write;

use crate::discovery::{DiscoveredEntry, DiscoveryConfig};
use crate::interaction::ToggleId;
use crate::nav::{Leaf, NavNode, NavSection, NavTree, Parent};
use crate::state::{NodeState, RenderState, SectionState};

/// Styles for toggles, children and the discovery badge.
///
/// Colors, spacing and radii come from custom properties defined by the host
/// site; none are declared here.
pub const STYLESHEET: &str = "\
.sidenav-section-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: var(--spacing-2);
}
.sidenav-section-toggle,
.sidenav-toggle {
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 0;
  background: none;
  border: none;
  border-radius: var(--radius-sm);
  cursor: pointer;
  transition: background 0.2s ease;
}
.sidenav-section-toggle { width: 20px; height: 20px; }
.sidenav-toggle { width: 24px; height: 24px; }
.sidenav-section-toggle:hover,
.sidenav-toggle:hover {
  background: var(--color-pearl-100);
}
.sidenav-section-content {
  max-height: 2000px;
  overflow: hidden;
  transition: max-height 0.3s ease;
}
.sidenav-section-collapsible .sidenav-section-content:not(.expanded) {
  max-height: 0;
}
.sidenav-item-parent {
  display: flex;
  flex-direction: column;
}
.sidenav-item-wrapper {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: var(--spacing-2);
}
.sidenav-item-wrapper .sidenav-item {
  flex: 1;
}
.sidenav-chevron {
  width: 10px;
  height: 10px;
  border-right: 2px solid var(--color-pearl-500);
  border-bottom: 2px solid var(--color-pearl-500);
  transform: rotate(45deg);
  transition: transform 0.2s ease;
}
.sidenav-section-collapsible.expanded .sidenav-section-toggle .sidenav-chevron,
.sidenav-item-parent.expanded .sidenav-chevron {
  transform: rotate(-135deg);
}
.sidenav-children {
  display: flex;
  flex-direction: column;
  max-height: 0;
  overflow: hidden;
  transition: max-height 0.3s ease;
}
.sidenav-children.expanded {
  max-height: 500px;
}
.sidenav-child {
  padding-left: var(--spacing-8) !important;
  font-size: 13px;
}
.auto-detected-badge {
  display: inline-block;
  margin-left: 8px;
  padding: 2px 6px;
  background: #FEF3C7;
  color: #F59E0B;
  font-size: 11px;
  font-weight: 600;
  border-radius: 4px;
  text-transform: uppercase;
}
";

/// Render the sidebar fragment.
///
/// `state` must be derived from the same `tree` and `discovered` entries.
/// The trailing discovery section is emitted only when `discovered` is
/// non-empty.
#[must_use]
pub fn render(
    tree: &NavTree,
    discovered: &[DiscoveredEntry],
    state: &RenderState,
    discovery: &DiscoveryConfig,
) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<aside class=\"sidenav\" aria-label=\"Site navigation\">\n");

    let sections = tree.sections.iter().zip(&state.sections);
    for (idx, (section, section_state)) in sections.enumerate() {
        render_section(&mut html, idx, section, section_state);
    }

    if !discovered.is_empty() {
        render_discovered(&mut html, discovered, &state.discovered, discovery);
    }

    html.push_str("</aside>\n");
    html
}

fn render_section(html: &mut String, idx: usize, section: &NavSection, state: &SectionState) {
    let toggle = ToggleId::Section(idx);
    // Sections without a toggle are always open
    let expanded = !section.collapsible || state.expanded;

    let _ = write!(
        html,
        "<div class=\"{}\"",
        class_list(
            "sidenav-section",
            &[
                ("sidenav-section-collapsible", section.collapsible),
                ("expanded", expanded),
            ],
        )
    );
    if section.collapsible {
        let _ = write!(html, " id=\"{}\"", toggle.container_id());
    }
    html.push_str(">\n<div class=\"sidenav-section-header\">\n");
    let _ = writeln!(
        html,
        "<div class=\"sidenav-section-title\">{}</div>",
        escape(&section.title)
    );
    if section.collapsible {
        render_toggle(html, "sidenav-section-toggle", toggle, expanded, &section.title);
    }
    html.push_str("</div>\n");

    let _ = write!(
        html,
        "<div class=\"{}\"",
        class_list("sidenav-section-content", &[("expanded", expanded)])
    );
    if section.collapsible {
        let _ = write!(html, " id=\"{}\"", toggle.content_id());
    }
    html.push_str(">\n");

    for (node_idx, (node, node_state)) in section.items.iter().zip(&state.nodes).enumerate() {
        match (node, node_state) {
            (NavNode::Leaf(leaf), NodeState::Leaf { active }) => {
                render_link(html, &leaf.href, &leaf.name, "sidenav-item", *active, false);
            }
            (
                NavNode::Parent(parent),
                NodeState::Parent {
                    active,
                    expanded,
                    children,
                },
            ) => {
                let toggle = ToggleId::Node {
                    section: idx,
                    node: node_idx,
                };
                render_parent(html, toggle, parent, *active, *expanded, children);
            }
            _ => tracing::warn!(
                section = %section.title,
                node = node.name(),
                "Render state does not match navigation tree, skipping node"
            ),
        }
    }

    html.push_str("</div>\n</div>\n");
}

fn render_parent(
    html: &mut String,
    toggle: ToggleId,
    parent: &Parent,
    active: bool,
    expanded: bool,
    children: &[bool],
) {
    let _ = writeln!(
        html,
        "<div class=\"{}\" id=\"{}\">",
        class_list(
            "sidenav-item-parent sidenav-collapsible",
            &[("expanded", expanded)]
        ),
        toggle.container_id()
    );
    html.push_str("<div class=\"sidenav-item-wrapper\">\n");
    match &parent.href {
        Some(href) => render_link(html, href, &parent.name, "sidenav-item", active, false),
        None => {
            let _ = writeln!(
                html,
                "<span class=\"sidenav-item sidenav-item-label\">{}</span>",
                escape(&parent.name)
            );
        }
    }
    render_toggle(html, "sidenav-toggle", toggle, expanded, &parent.name);
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<div class=\"{}\" id=\"{}\">",
        class_list("sidenav-children", &[("expanded", expanded)]),
        toggle.content_id()
    );
    for (child, active) in parent.children.iter().zip(children) {
        let Leaf { name, href } = child;
        render_link(html, href, name, "sidenav-item sidenav-child", *active, false);
    }
    html.push_str("</div>\n</div>\n");
}

fn render_discovered(
    html: &mut String,
    entries: &[DiscoveredEntry],
    active: &[bool],
    discovery: &DiscoveryConfig,
) {
    html.push_str("<div class=\"sidenav-section sidenav-section-discovered expanded\">\n");
    html.push_str("<div class=\"sidenav-section-header\">\n");
    let _ = writeln!(
        html,
        "<div class=\"sidenav-section-title\">{}</div>",
        escape(&discovery.section_title)
    );
    html.push_str("</div>\n<div class=\"sidenav-section-content expanded\">\n");

    for (idx, entry) in entries.iter().enumerate() {
        let is_active = active.get(idx).copied().unwrap_or(false);
        render_link(
            html,
            &entry.href,
            &entry.name,
            "sidenav-item",
            is_active,
            discovery.show_badge,
        );
    }

    html.push_str("</div>\n</div>\n");
}

fn render_link(html: &mut String, href: &str, name: &str, base: &str, active: bool, badge: bool) {
    let _ = write!(
        html,
        "<a href=\"{}\" class=\"{}\"",
        escape(href),
        class_list(base, &[("active", active)])
    );
    if active {
        html.push_str(" aria-current=\"page\"");
    }
    let _ = write!(html, ">{}", escape(name));
    if badge {
        html.push_str("<span class=\"auto-detected-badge\">New</span>");
    }
    html.push_str("</a>\n");
}

fn render_toggle(html: &mut String, class: &str, toggle: ToggleId, expanded: bool, label: &str) {
    let _ = writeln!(
        html,
        "<button type=\"button\" class=\"{class}\" data-sidenav-toggle=\"{toggle}\" \
         aria-controls=\"{}\" aria-expanded=\"{expanded}\" aria-label=\"Toggle {}\">\
         <span class=\"sidenav-chevron\"></span></button>",
        toggle.content_id(),
        escape(label),
    );
}

/// Base classes followed by every flagged modifier.
fn class_list(base: &str, modifiers: &[(&str, bool)]) -> String {
    let mut classes = base.to_owned();
    for (class, enabled) in modifiers {
        if *enabled {
            classes.push(' ');
            classes.push_str(class);
        }
    }
    classes
}

/// Escape HTML special characters.
pub(crate) fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::toggle_ids;
    use crate::state::derive;

    fn cards_tree() -> NavTree {
        NavTree::new(vec![
            NavSection::new("Getting Started", vec![Leaf::new("Overview", "index.html").into()]),
            NavSection::new(
                "Components",
                vec![
                    Leaf::new("Buttons", "buttons.html").into(),
                    Parent::new(
                        "Cards",
                        vec![
                            Leaf::new("Product Cards", "product-cards.html"),
                            Leaf::new("Supplier Cards", "supplier-cards.html"),
                        ],
                    )
                    .into(),
                ],
            ),
        ])
    }

    fn render_for(tree: &NavTree, discovered: &[DiscoveredEntry], page: &str) -> String {
        let state = derive(tree, discovered, page);
        render(tree, discovered, &state, &DiscoveryConfig::default())
    }

    #[test]
    fn test_cards_scenario_marks_single_active_link() {
        let html = render_for(&cards_tree(), &[], "supplier-cards.html");

        assert_eq!(html.matches("aria-current=\"page\"").count(), 1);
        assert!(html.contains(
            "<a href=\"supplier-cards.html\" class=\"sidenav-item sidenav-child active\" \
             aria-current=\"page\">Supplier Cards</a>"
        ));
        assert!(html.contains(
            "<a href=\"product-cards.html\" class=\"sidenav-item sidenav-child\">Product Cards</a>"
        ));
        assert!(html.contains(
            "<div class=\"sidenav-item-parent sidenav-collapsible expanded\" id=\"sidenav-s1-n1\">"
        ));
        assert!(html.contains(
            "<div class=\"sidenav-children expanded\" id=\"sidenav-s1-n1-content\">"
        ));
    }

    #[test]
    fn test_collapsed_parent_without_active_child() {
        let html = render_for(&cards_tree(), &[], "buttons.html");

        assert!(html.contains("<div class=\"sidenav-children\" id=\"sidenav-s1-n1-content\">"));
        assert!(html.contains("aria-expanded=\"false\""));
        assert!(html.contains("<span class=\"sidenav-item sidenav-item-label\">Cards</span>"));
    }

    #[test]
    fn test_parent_with_href_renders_link_header() {
        let mut tree = cards_tree();
        if let NavNode::Parent(parent) = &mut tree.sections[1].items[1] {
            parent.href = Some("cards.html".to_owned());
        }

        let html = render_for(&tree, &[], "cards.html");

        assert!(html.contains(
            "<a href=\"cards.html\" class=\"sidenav-item active\" aria-current=\"page\">Cards</a>"
        ));
        assert!(html.contains("sidenav-children expanded"));
    }

    #[test]
    fn test_no_discovered_section_when_empty() {
        let html = render_for(&cards_tree(), &[], "index.html");

        assert!(!html.contains("sidenav-section-discovered"));
        assert!(!html.contains("Other Pages"));
    }

    #[test]
    fn test_discovered_section_with_badge() {
        let discovered = vec![DiscoveredEntry::new("new-widget.html", ".html")];

        let html = render_for(&cards_tree(), &discovered, "new-widget.html");

        assert!(html.contains("<div class=\"sidenav-section-title\">Other Pages</div>"));
        assert!(html.contains(
            "<a href=\"new-widget.html\" class=\"sidenav-item active\" aria-current=\"page\">\
             New Widget<span class=\"auto-detected-badge\">New</span></a>"
        ));
        // Discovered section comes last
        assert!(html.find("Other Pages").unwrap() > html.find("Components").unwrap());
    }

    #[test]
    fn test_discovered_section_without_badge() {
        let tree = cards_tree();
        let discovered = vec![DiscoveredEntry::new("b.html", ".html")];
        let state = derive(&tree, &discovered, "index.html");
        let config = DiscoveryConfig {
            show_badge: false,
            section_title: "Unlisted".to_owned(),
            ..DiscoveryConfig::default()
        };

        let html = render(&tree, &discovered, &state, &config);

        assert!(html.contains("Unlisted"));
        assert!(!html.contains("auto-detected-badge"));
    }

    #[test]
    fn test_collapsible_section_gets_toggle() {
        let mut tree = cards_tree();
        tree.sections[0].collapsible = true;

        let collapsed = render_for(&tree, &[], "buttons.html");
        let expanded = render_for(&tree, &[], "index.html");

        assert!(collapsed.contains(
            "<div class=\"sidenav-section sidenav-section-collapsible\" id=\"sidenav-s0\">"
        ));
        assert!(collapsed.contains("data-sidenav-toggle=\"s0\""));
        assert!(expanded.contains(
            "<div class=\"sidenav-section sidenav-section-collapsible expanded\" id=\"sidenav-s0\">"
        ));
    }

    #[test]
    fn test_plain_sections_always_open() {
        let html = render_for(&cards_tree(), &[], "missing.html");

        assert_eq!(
            html.matches("<div class=\"sidenav-section-content expanded\">")
                .count(),
            2
        );
        assert!(!html.contains("sidenav-section-toggle"));
    }

    #[test]
    fn test_toggles_in_markup_match_toggle_ids() {
        let mut tree = cards_tree();
        tree.sections[1].collapsible = true;

        let html = render_for(&tree, &[], "index.html");

        for id in toggle_ids(&tree) {
            assert!(
                html.contains(&format!("data-sidenav-toggle=\"{id}\"")),
                "missing toggle {id}"
            );
        }
        assert_eq!(
            html.matches("data-sidenav-toggle=").count(),
            toggle_ids(&tree).len()
        );
    }

    #[test]
    fn test_section_order_preserved() {
        let html = render_for(&cards_tree(), &[], "index.html");

        let getting_started = html.find("Getting Started").unwrap();
        let components = html.find("Components").unwrap();
        let buttons = html.find("buttons.html").unwrap();
        let cards = html.find("Cards").unwrap();
        assert!(getting_started < components);
        assert!(buttons < cards);
    }

    #[test]
    fn test_names_are_escaped() {
        let tree = NavTree::new(vec![NavSection::new(
            "Forms & <Inputs>",
            vec![Leaf::new("Input Fields & Forms", "forms.html?a=\"1\"").into()],
        )]);

        let html = render_for(&tree, &[], "index.html");

        assert!(html.contains("Forms &amp; &lt;Inputs&gt;"));
        assert!(html.contains("Input Fields &amp; Forms"));
        assert!(html.contains("href=\"forms.html?a=&quot;1&quot;\""));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a&b"), "a&amp;b");
        assert_eq!(escape("it's"), "it&#x27;s");
    }
}
