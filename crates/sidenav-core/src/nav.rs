//! Declarative navigation tree.
//!
//! A [`NavTree`] is an ordered list of [`NavSection`]s. Each section holds
//! [`NavNode`]s: either a [`Leaf`] linking to a page, or a [`Parent`] grouping
//! child leaves. Nesting stops there, children are always leaves.
//!
//! Every href in the tree must be unique. [`NavTree::validate`] checks this
//! (and a few structural rules) so configuration mistakes surface at startup
//! instead of as an ambiguous active item at render time.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Full navigation structure, in rendering order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavTree {
    /// Sections in display order.
    pub sections: Vec<NavSection>,
}

/// Titled group of navigation nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    /// Non-interactive section title.
    pub title: String,
    /// Whether the section gets its own expand/collapse toggle.
    #[serde(default)]
    pub collapsible: bool,
    /// Nodes in display order.
    #[serde(default)]
    pub items: Vec<NavNode>,
}

/// Single navigation node.
///
/// Deserialized untagged: a table with `children` is a [`Parent`],
/// anything else must be a [`Leaf`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavNode {
    /// Group of child leaves.
    Parent(Parent),
    /// Direct link to a page.
    Leaf(Leaf),
}

/// Direct link to a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Leaf {
    /// Display name.
    pub name: String,
    /// Page identifier (e.g. `buttons.html`).
    pub href: String,
}

/// Node grouping child leaves under a toggleable header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parent {
    /// Header label.
    pub name: String,
    /// Optional overview page the header label links to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Child links in display order.
    pub children: Vec<Leaf>,
}

/// Configuration error in a [`NavTree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// The same href appears twice.
    #[error("Duplicate href '{href}' in navigation: {first} and {second}")]
    DuplicateHref {
        /// The repeated page identifier.
        href: String,
        /// Location of the first occurrence (e.g. "Components > Cards").
        first: String,
        /// Location of the repeated occurrence.
        second: String,
    },
    /// A parent node without children.
    #[error("Navigation item '{name}' in section '{section}' has no children")]
    EmptyParent {
        /// Section title.
        section: String,
        /// Parent name.
        name: String,
    },
    /// A link with an empty href.
    #[error("Navigation item '{name}' in section '{section}' has an empty href")]
    EmptyHref {
        /// Section title.
        section: String,
        /// Node name.
        name: String,
    },
}

impl NavTree {
    /// Create a tree from sections.
    #[must_use]
    pub fn new(sections: Vec<NavSection>) -> Self {
        Self { sections }
    }

    /// All hrefs in tree order, parent href before its children.
    pub fn hrefs(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter())
            .flat_map(NavNode::hrefs)
    }

    /// Set of every page already present in the tree.
    #[must_use]
    pub fn listed_pages(&self) -> HashSet<&str> {
        self.hrefs().collect()
    }

    /// Check structural rules and href uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first [`NavError`] found in tree order.
    pub fn validate(&self) -> Result<(), NavError> {
        let mut seen: HashMap<&str, String> = HashMap::new();

        for section in &self.sections {
            for node in &section.items {
                match node {
                    NavNode::Leaf(leaf) => {
                        require_href(section, &leaf.name, &leaf.href)?;
                        let location = format!("{} > {}", section.title, leaf.name);
                        claim(&mut seen, &leaf.href, location)?;
                    }
                    NavNode::Parent(parent) => {
                        if parent.children.is_empty() {
                            return Err(NavError::EmptyParent {
                                section: section.title.clone(),
                                name: parent.name.clone(),
                            });
                        }
                        if let Some(href) = &parent.href {
                            require_href(section, &parent.name, href)?;
                            let location = format!("{} > {}", section.title, parent.name);
                            claim(&mut seen, href, location)?;
                        }
                        for child in &parent.children {
                            require_href(section, &child.name, &child.href)?;
                            claim(
                                &mut seen,
                                &child.href,
                                format!("{} > {} > {}", section.title, parent.name, child.name),
                            )?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn claim<'a>(
    seen: &mut HashMap<&'a str, String>,
    href: &'a str,
    location: String,
) -> Result<(), NavError> {
    if let Some(first) = seen.get(href) {
        return Err(NavError::DuplicateHref {
            href: href.to_owned(),
            first: first.clone(),
            second: location,
        });
    }
    seen.insert(href, location);
    Ok(())
}

fn require_href(section: &NavSection, name: &str, href: &str) -> Result<(), NavError> {
    if href.trim().is_empty() {
        return Err(NavError::EmptyHref {
            section: section.title.clone(),
            name: name.to_owned(),
        });
    }
    Ok(())
}

impl NavSection {
    /// Create an always-open section.
    #[must_use]
    pub fn new(title: impl Into<String>, items: Vec<NavNode>) -> Self {
        Self {
            title: title.into(),
            collapsible: false,
            items,
        }
    }

    /// Give the section its own toggle.
    #[must_use]
    pub fn collapsible(mut self) -> Self {
        self.collapsible = true;
        self
    }
}

impl NavNode {
    /// Display name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.name,
            Self::Parent(parent) => &parent.name,
        }
    }

    /// Hrefs owned by this node, parent href first.
    fn hrefs(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Leaf(leaf) => Box::new(std::iter::once(leaf.href.as_str())),
            Self::Parent(parent) => Box::new(
                parent
                    .href
                    .as_deref()
                    .into_iter()
                    .chain(parent.children.iter().map(|child| child.href.as_str())),
            ),
        }
    }
}

impl Leaf {
    /// Create a leaf node.
    #[must_use]
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

impl From<Leaf> for NavNode {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl Parent {
    /// Create a parent without an overview page.
    #[must_use]
    pub fn new(name: impl Into<String>, children: Vec<Leaf>) -> Self {
        Self {
            name: name.into(),
            href: None,
            children,
        }
    }

    /// Link the header label to an overview page.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

impl From<Parent> for NavNode {
    fn from(parent: Parent) -> Self {
        Self::Parent(parent)
    }
}
