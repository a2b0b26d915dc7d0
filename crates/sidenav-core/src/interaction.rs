//! Client-side expand/collapse toggles.
//!
//! Toggling is presentation state only. [`ViewState`] starts from a
//! [`RenderState`] and flips entries on [`ViewState::toggle`]; nothing flows
//! back into the render state, and the next page load derives everything from
//! scratch again, dropping any manual toggles.
//!
//! In the rendered document the same behavior is provided by
//! [`BINDING_SCRIPT`], which listens on every `data-sidenav-toggle` element
//! and flips the `expanded` class on the matching container and its content.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::nav::{NavNode, NavTree};
use crate::state::{NodeState, RenderState};

/// Identifies a toggle affordance: a collapsible section or a parent node.
///
/// Formats as `s{section}` or `s{section}-n{node}`; the same string is used
/// for the `data-sidenav-toggle` attribute in rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToggleId {
    /// Header toggle of a collapsible section.
    Section(usize),
    /// Header toggle of a parent node.
    Node {
        /// Section index.
        section: usize,
        /// Node index within the section.
        node: usize,
    },
}

/// Error parsing a [`ToggleId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid toggle id: {0}")]
pub struct ParseToggleIdError(String);

impl ToggleId {
    /// DOM id of the toggled container.
    #[must_use]
    pub fn container_id(self) -> String {
        format!("sidenav-{self}")
    }

    /// DOM id of the content/children block shown when expanded.
    #[must_use]
    pub fn content_id(self) -> String {
        format!("sidenav-{self}-content")
    }
}

impl fmt::Display for ToggleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(section) => write!(f, "s{section}"),
            Self::Node { section, node } => write!(f, "s{section}-n{node}"),
        }
    }
}

impl FromStr for ToggleId {
    type Err = ParseToggleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseToggleIdError(s.to_owned());
        let rest = s.strip_prefix('s').ok_or_else(invalid)?;

        match rest.split_once("-n") {
            Some((section, node)) => Ok(Self::Node {
                section: parse_index(section).ok_or_else(invalid)?,
                node: parse_index(node).ok_or_else(invalid)?,
            }),
            None => Ok(Self::Section(parse_index(rest).ok_or_else(invalid)?)),
        }
    }
}

/// Canonical decimal index: ASCII digits only, no leading zeros.
fn parse_index(digits: &str) -> Option<usize> {
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if canonical { digits.parse().ok() } else { None }
}

/// Every toggle the renderer emits for `tree`, in document order.
#[must_use]
pub fn toggle_ids(tree: &NavTree) -> Vec<ToggleId> {
    let mut ids = Vec::new();
    for (section_idx, section) in tree.sections.iter().enumerate() {
        if section.collapsible {
            ids.push(ToggleId::Section(section_idx));
        }
        for (node_idx, node) in section.items.iter().enumerate() {
            if matches!(node, NavNode::Parent(_)) {
                ids.push(ToggleId::Node {
                    section: section_idx,
                    node: node_idx,
                });
            }
        }
    }
    ids
}

/// Ephemeral expanded/collapsed presentation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    toggles: BTreeSet<ToggleId>,
    expanded: BTreeSet<ToggleId>,
}

impl ViewState {
    /// Initial presentation state matching the rendered markup.
    #[must_use]
    pub fn from_render_state(tree: &NavTree, state: &RenderState) -> Self {
        let toggles: BTreeSet<_> = toggle_ids(tree).into_iter().collect();
        let expanded = toggles
            .iter()
            .copied()
            .filter(|id| match *id {
                ToggleId::Section(section) => state
                    .sections
                    .get(section)
                    .is_some_and(|s| s.expanded),
                ToggleId::Node { section, node } => state
                    .sections
                    .get(section)
                    .and_then(|s| s.nodes.get(node))
                    .is_some_and(NodeState::is_expanded),
            })
            .collect();
        Self { toggles, expanded }
    }

    /// Whether the container behind `id` is shown expanded.
    #[must_use]
    pub fn is_expanded(&self, id: ToggleId) -> bool {
        self.expanded.contains(&id)
    }

    /// New state with `id` flipped.
    ///
    /// Ids with no toggle in the tree leave the state unchanged.
    #[must_use]
    pub fn toggle(&self, id: ToggleId) -> Self {
        let mut next = self.clone();
        if !self.toggles.contains(&id) {
            tracing::debug!(%id, "Ignoring toggle without a matching affordance");
            return next;
        }
        if !next.expanded.remove(&id) {
            next.expanded.insert(id);
        }
        next
    }
}

/// Script binding toggle clicks in the host document.
///
/// Binding is deferred so the freshly inserted sidebar is in the document
/// before handlers are attached.
pub const BINDING_SCRIPT: &str = r"(function () {
  function bind() {
    document.querySelectorAll('[data-sidenav-toggle]').forEach(function (toggle) {
      toggle.addEventListener('click', function (event) {
        event.preventDefault();
        var id = toggle.getAttribute('data-sidenav-toggle');
        var container = document.getElementById('sidenav-' + id);
        var content = document.getElementById('sidenav-' + id + '-content');
        if (!container || !content) {
          return;
        }
        var expanded = container.classList.toggle('expanded');
        content.classList.toggle('expanded', expanded);
        toggle.setAttribute('aria-expanded', String(expanded));
      });
    });
  }

  function init() {
    setTimeout(bind, 100);
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', init);
  } else {
    init();
  }
})();";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{Leaf, NavSection, Parent};
    use crate::state::derive;

    fn tree() -> NavTree {
        NavTree::new(vec![
            NavSection::new("Getting Started", vec![Leaf::new("Overview", "index.html").into()])
                .collapsible(),
            NavSection::new(
                "Components",
                vec![
                    Leaf::new("Chips", "chips.html").into(),
                    Parent::new("Cards", vec![Leaf::new("Blog Cards", "blog-cards.html")]).into(),
                ],
            ),
        ])
    }

    #[test]
    fn test_toggle_id_display_and_parse() {
        let node = ToggleId::Node {
            section: 2,
            node: 11,
        };

        assert_eq!(node.to_string(), "s2-n11");
        assert_eq!("s2-n11".parse::<ToggleId>(), Ok(node));
        assert_eq!("s4".parse::<ToggleId>(), Ok(ToggleId::Section(4)));
        assert_eq!(node.container_id(), "sidenav-s2-n11");
        assert_eq!(node.content_id(), "sidenav-s2-n11-content");
    }

    #[test]
    fn test_toggle_id_parse_rejects_garbage() {
        for input in ["", "s", "x1", "s1-n", "s-n2", "sa"] {
            assert!(input.parse::<ToggleId>().is_err(), "{input:?}");
        }
    }

    #[test]
    fn test_toggle_id_parse_requires_canonical_digits() {
        for input in ["s+1", "s01", "s1-n+2", "s1-n007", "s 1", "s1-n-2"] {
            assert!(input.parse::<ToggleId>().is_err(), "{input:?}");
        }
        assert_eq!("s0-n0".parse::<ToggleId>().unwrap().to_string(), "s0-n0");
        assert_eq!("s10".parse::<ToggleId>().unwrap().to_string(), "s10");
    }

    #[test]
    fn test_toggle_ids_cover_collapsible_sections_and_parents() {
        assert_eq!(
            toggle_ids(&tree()),
            vec![
                ToggleId::Section(0),
                ToggleId::Node {
                    section: 1,
                    node: 1
                },
            ]
        );
    }

    #[test]
    fn test_view_state_starts_from_render_state() {
        let tree = tree();
        let state = derive(&tree, &[], "blog-cards.html");
        let cards = ToggleId::Node {
            section: 1,
            node: 1,
        };

        let view = ViewState::from_render_state(&tree, &state);

        assert!(view.is_expanded(cards));
        assert!(!view.is_expanded(ToggleId::Section(0)));
    }

    #[test]
    fn test_toggle_flips_only_target() {
        let tree = tree();
        let state = derive(&tree, &[], "blog-cards.html");
        let cards = ToggleId::Node {
            section: 1,
            node: 1,
        };
        let view = ViewState::from_render_state(&tree, &state);

        let collapsed = view.toggle(cards);
        let reopened = collapsed.toggle(cards);

        assert!(!collapsed.is_expanded(cards));
        assert!(!collapsed.is_expanded(ToggleId::Section(0)));
        assert_eq!(reopened, view);
    }

    #[test]
    fn test_toggle_does_not_touch_render_state() {
        let tree = tree();
        let state = derive(&tree, &[], "blog-cards.html");
        let view = ViewState::from_render_state(&tree, &state);

        let _ = view.toggle(ToggleId::Section(0));

        assert_eq!(state, derive(&tree, &[], "blog-cards.html"));
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let tree = tree();
        let view = ViewState::from_render_state(&tree, &derive(&tree, &[], "index.html"));

        assert_eq!(view.toggle(ToggleId::Section(1)), view);
        assert_eq!(
            view.toggle(ToggleId::Node {
                section: 1,
                node: 0
            }),
            view
        );
    }
}
