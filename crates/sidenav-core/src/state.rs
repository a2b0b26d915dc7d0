//! Active/expanded state derivation.
//!
//! [`derive`] annotates a navigation tree for one page load. It is a pure
//! function of the tree, the discovered entries and the current page: the
//! resulting [`RenderState`] is never stored or patched, only recomputed.
//!
//! Rules:
//! - a link is active when its href equals the current page;
//! - a parent is expanded when any child is active, or its own href is;
//! - a section is expanded when anything inside it is active.
//!
//! Only the first matching href in tree order is marked active, so a tree
//! that slipped past [`NavTree::validate`](crate::NavTree::validate) with a
//! duplicate still highlights a single link.

use serde::Serialize;

use crate::discovery::DiscoveredEntry;
use crate::nav::{NavNode, NavTree};

/// Derived annotations for every node of a tree, index-aligned with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderState {
    /// One entry per [`NavSection`](crate::NavSection).
    pub sections: Vec<SectionState>,
    /// Active flag per discovered entry.
    pub discovered: Vec<bool>,
}

/// Derived state of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionState {
    /// Whether any descendant is active.
    pub expanded: bool,
    /// One entry per node of the section.
    pub nodes: Vec<NodeState>,
}

/// Derived state of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeState {
    /// State of a [`Leaf`](crate::Leaf).
    Leaf {
        /// Current page is this leaf.
        active: bool,
    },
    /// State of a [`Parent`](crate::Parent).
    Parent {
        /// Current page is the parent's own href.
        active: bool,
        /// Children are shown.
        expanded: bool,
        /// Active flag per child.
        children: Vec<bool>,
    },
}

impl NodeState {
    /// Whether the node itself is the current page.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Leaf { active } | Self::Parent { active, .. } => *active,
        }
    }

    /// Whether the node's children are shown. Always `false` for leaves.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Parent { expanded: true, .. })
    }
}

impl RenderState {
    /// Number of links marked active anywhere in the state.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let in_tree: usize = self
            .sections
            .iter()
            .flat_map(|section| &section.nodes)
            .map(|node| match node {
                NodeState::Leaf { active } => usize::from(*active),
                NodeState::Parent {
                    active, children, ..
                } => usize::from(*active) + children.iter().filter(|c| **c).count(),
            })
            .sum();
        in_tree + self.discovered.iter().filter(|d| **d).count()
    }
}

/// Claims the first href equal to the current page.
struct ActiveMatcher<'a> {
    current_page: &'a str,
    claimed: bool,
}

impl ActiveMatcher<'_> {
    fn matches(&mut self, href: &str) -> bool {
        if self.claimed || href != self.current_page {
            return false;
        }
        self.claimed = true;
        true
    }
}

/// Derive active/expanded state for one page load.
#[must_use]
pub fn derive(tree: &NavTree, discovered: &[DiscoveredEntry], current_page: &str) -> RenderState {
    let mut matcher = ActiveMatcher {
        current_page,
        claimed: false,
    };

    let sections = tree
        .sections
        .iter()
        .map(|section| {
            let nodes: Vec<_> = section
                .items
                .iter()
                .map(|node| derive_node(node, &mut matcher))
                .collect();
            let expanded = nodes
                .iter()
                .any(|node| node.is_active() || node.is_expanded());
            SectionState { expanded, nodes }
        })
        .collect();

    let discovered = discovered
        .iter()
        .map(|entry| matcher.matches(&entry.href))
        .collect();

    RenderState {
        sections,
        discovered,
    }
}

fn derive_node(node: &NavNode, matcher: &mut ActiveMatcher<'_>) -> NodeState {
    match node {
        NavNode::Leaf(leaf) => NodeState::Leaf {
            active: matcher.matches(&leaf.href),
        },
        NavNode::Parent(parent) => {
            let active = parent
                .href
                .as_deref()
                .is_some_and(|href| matcher.matches(href));
            let children: Vec<bool> = parent
                .children
                .iter()
                .map(|child| matcher.matches(&child.href))
                .collect();
            let expanded = active || children.iter().any(|c| *c);
            NodeState::Parent {
                active,
                expanded,
                children,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::nav::{Leaf, NavSection, Parent};

    fn tree() -> NavTree {
        NavTree::new(vec![
            NavSection::new("Foundation", vec![Leaf::new("Colors", "colors.html").into()]),
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
                    Leaf::new("Modal", "modal.html").into(),
                ],
            ),
        ])
    }

    #[test]
    fn test_active_child_expands_parent_and_section() {
        let state = derive(&tree(), &[], "supplier-cards.html");

        assert_eq!(
            state.sections[1],
            SectionState {
                expanded: true,
                nodes: vec![
                    NodeState::Leaf { active: false },
                    NodeState::Parent {
                        active: false,
                        expanded: true,
                        children: vec![false, true],
                    },
                    NodeState::Leaf { active: false },
                ],
            }
        );
        assert!(!state.sections[0].expanded);
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_active_leaf_leaves_parent_collapsed() {
        let state = derive(&tree(), &[], "buttons.html");

        assert!(state.sections[1].nodes[0].is_active());
        assert!(!state.sections[1].nodes[1].is_expanded());
        assert!(state.sections[1].expanded);
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_parent_href_active_expands_parent() {
        let mut tree = tree();
        if let NavNode::Parent(parent) = &mut tree.sections[1].items[1] {
            parent.href = Some("cards.html".to_owned());
        }

        let state = derive(&tree, &[], "cards.html");

        assert_eq!(
            state.sections[1].nodes[1],
            NodeState::Parent {
                active: true,
                expanded: true,
                children: vec![false, false],
            }
        );
    }

    #[test]
    fn test_unknown_page_marks_nothing() {
        let state = derive(&tree(), &[], "missing.html");

        assert_eq!(state.active_count(), 0);
        assert!(state.sections.iter().all(|s| !s.expanded));
    }

    #[test]
    fn test_discovered_entry_active() {
        let discovered = vec![
            DiscoveredEntry::new("new-widget.html", ".html"),
            DiscoveredEntry::new("other.html", ".html"),
        ];

        let state = derive(&tree(), &discovered, "new-widget.html");

        assert_eq!(state.discovered, vec![true, false]);
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_duplicate_href_first_match_wins() {
        let mut tree = tree();
        tree.sections[0]
            .items
            .push(Leaf::new("Modal again", "modal.html").into());

        let state = derive(&tree, &[], "modal.html");

        assert!(state.sections[0].nodes[1].is_active());
        assert!(!state.sections[1].nodes[2].is_active());
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_at_most_one_active_for_every_page() {
        let tree = tree();

        for href in tree.hrefs() {
            let state = derive(&tree, &[], href);
            assert_eq!(state.active_count(), 1, "page {href}");
        }
    }

    #[test]
    fn test_derive_is_idempotent() {
        let tree = tree();
        let discovered = vec![DiscoveredEntry::new("b.html", ".html")];

        let first = derive(&tree, &discovered, "product-cards.html");
        let second = derive(&tree, &discovered, "product-cards.html");

        assert_eq!(first, second);
    }
}
