//! Navigation tree model
//!
//! A tree is rooted in a [`Menu`]; menus hold ordered children, menu items
//! are leaves and separators carry nothing but their position. Ownership
//! makes the tree shape explicit: every non-root node has exactly one
//! parent and no node is shared.
//!
//! JSON form (used for template files and for redacted responses):
//!
//! ```json
//! { "kind": "menuItem", "id": "calendar", "href": "calendar",
//!   "cssClasses": ["icon-fixed-width"], "iconIdentifier": "calendar",
//!   "enabled": true, "authorizationPatterns": "forodrim/members/*" }
//! ```

use mithlond_authz::PatternSet;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{NavigationError, Result};

/// Css class added to nodes that cannot be activated
pub const DISABLED_CSS_CLASS: &str = "disabled";

/// Css class added to nodes that show an icon
pub const ICON_FIXED_WIDTH_CSS_CLASS: &str = "icon-fixed-width";

/// Css class rendered for separators
pub const SEPARATOR_CSS_CLASS: &str = "divider";

/// ARIA role rendered for separators
pub const SEPARATOR_ROLE: &str = "separator";

fn default_enabled() -> bool {
    true
}

/// Attributes shared by menus and menu items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAttributes {
    /// ARIA role attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<String>,

    /// DOM id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tab_index: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) icon_identifier: Option<String>,

    /// Navigable destination; the datum protected by redaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) href: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) css_classes: Vec<String>,

    #[serde(default = "default_enabled")]
    pub(crate) enabled: bool,

    /// Localized texts keyed by language code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) texts: BTreeMap<String, String>,

    /// Policy metadata; only present in templates
    #[serde(
        default,
        rename = "authorizationPatterns",
        skip_serializing_if = "PatternSet::is_empty"
    )]
    pub(crate) required_patterns: PatternSet,
}

impl Default for LinkAttributes {
    fn default() -> Self {
        Self {
            role: None,
            id: None,
            tab_index: None,
            icon_identifier: None,
            href: None,
            css_classes: Vec::new(),
            enabled: true,
            texts: BTreeMap::new(),
            required_patterns: PatternSet::new(),
        }
    }
}

impl LinkAttributes {
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn tab_index(&self) -> Option<u32> {
        self.tab_index
    }

    pub fn icon_identifier(&self) -> Option<&str> {
        self.icon_identifier.as_deref()
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn css_classes(&self) -> &[String] {
        &self.css_classes
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn required_patterns(&self) -> &PatternSet {
        &self.required_patterns
    }

    pub fn texts(&self) -> &BTreeMap<String, String> {
        &self.texts
    }

    /// Text for `language`, falling back to the first available text
    pub fn text(&self, language: &str) -> Option<&str> {
        self.texts
            .get(language)
            .or_else(|| self.texts.values().next())
            .map(String::as_str)
    }
}

/// Menu node holding ordered children
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Menu {
    #[serde(flatten)]
    pub(crate) attributes: LinkAttributes,

    #[serde(default)]
    pub(crate) children: Vec<NavNode>,
}

impl Menu {
    pub fn attributes(&self) -> &LinkAttributes {
        &self.attributes
    }

    pub fn children(&self) -> &[NavNode] {
        &self.children
    }

    /// Number of nodes in this menu's subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NavNode::node_count).sum::<usize>()
    }

    /// Nesting depth of this subtree; a menu without children has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(NavNode::depth).max().unwrap_or(0)
    }

    /// Pre-order walk over the children's subtrees
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Finds the first descendant with the given DOM id
    pub fn find_by_id(&self, id: &str) -> Option<&NavNode> {
        self.walk().find(|node| node.id() == Some(id))
    }
}

/// Leaf node linking somewhere
///
/// A template document giving a menu item `children` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "MenuItemDocument")]
pub struct MenuItem {
    #[serde(flatten)]
    pub(crate) attributes: LinkAttributes,
}

#[derive(Deserialize)]
struct MenuItemDocument {
    #[serde(flatten)]
    attributes: LinkAttributes,
    #[serde(default)]
    children: Option<IgnoredAny>,
}

impl TryFrom<MenuItemDocument> for MenuItem {
    type Error = String;

    fn try_from(document: MenuItemDocument) -> std::result::Result<Self, Self::Error> {
        if document.children.is_some() {
            return Err(format!(
                "menu item [{}] cannot have children",
                document.attributes.id.as_deref().unwrap_or("<no id>")
            ));
        }
        Ok(Self {
            attributes: document.attributes,
        })
    }
}

impl MenuItem {
    pub fn attributes(&self) -> &LinkAttributes {
        &self.attributes
    }
}

/// Discriminant of a [`NavNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Menu,
    MenuItem,
    Separator,
}

/// A node within a navigation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavNode {
    Menu(Menu),
    MenuItem(MenuItem),
    /// Always visible, never restricted
    Separator,
}

impl NavNode {
    /// Starts building a menu
    pub fn menu() -> NavNodeBuilder {
        NavNodeBuilder::new(NodeKind::Menu)
    }

    /// Starts building a menu item
    pub fn menu_item() -> NavNodeBuilder {
        NavNodeBuilder::new(NodeKind::MenuItem)
    }

    pub fn separator() -> Self {
        NavNode::Separator
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NavNode::Menu(_) => NodeKind::Menu,
            NavNode::MenuItem(_) => NodeKind::MenuItem,
            NavNode::Separator => NodeKind::Separator,
        }
    }

    /// Attributes of menus and menu items; `None` for separators
    pub fn attributes(&self) -> Option<&LinkAttributes> {
        match self {
            NavNode::Menu(menu) => Some(&menu.attributes),
            NavNode::MenuItem(item) => Some(&item.attributes),
            NavNode::Separator => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes().and_then(LinkAttributes::id)
    }

    pub fn href(&self) -> Option<&str> {
        self.attributes().and_then(LinkAttributes::href)
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            NavNode::Separator => Some(SEPARATOR_ROLE),
            _ => self.attributes().and_then(LinkAttributes::role),
        }
    }

    /// Separators are always enabled
    pub fn is_enabled(&self) -> bool {
        self.attributes().map_or(true, LinkAttributes::is_enabled)
    }

    pub fn css_classes(&self) -> Vec<&str> {
        match self.attributes() {
            Some(attributes) => attributes.css_classes.iter().map(String::as_str).collect(),
            None => vec![SEPARATOR_CSS_CLASS],
        }
    }

    pub fn has_css_class(&self, class: &str) -> bool {
        self.css_classes().contains(&class)
    }

    /// Required patterns; separators are never restricted
    pub fn required_patterns(&self) -> Option<&PatternSet> {
        self.attributes().map(LinkAttributes::required_patterns)
    }

    pub fn is_restricted(&self) -> bool {
        self.required_patterns().is_some_and(|patterns| !patterns.is_empty())
    }

    pub fn children(&self) -> &[NavNode] {
        match self {
            NavNode::Menu(menu) => &menu.children,
            NavNode::MenuItem(_) | NavNode::Separator => &[],
        }
    }

    pub fn as_menu(&self) -> Option<&Menu> {
        match self {
            NavNode::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            NavNode::Menu(menu) => menu.node_count(),
            NavNode::MenuItem(_) | NavNode::Separator => 1,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            NavNode::Menu(menu) => menu.depth(),
            NavNode::MenuItem(_) | NavNode::Separator => 1,
        }
    }
}

/// Pre-order iterator over navigation nodes
pub struct Walk<'a> {
    stack: Vec<&'a NavNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a NavNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Builder for menus and menu items
///
/// Normalises css classes at build time: an icon adds
/// `icon-fixed-width`, an authored `enabled = false` adds `disabled`, and
/// duplicates are dropped keeping the first occurrence.
#[derive(Debug, Clone)]
pub struct NavNodeBuilder {
    kind: NodeKind,
    attributes: LinkAttributes,
    authorization_patterns: Option<String>,
    children: Vec<NavNode>,
}

impl NavNodeBuilder {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: LinkAttributes::default(),
            authorization_patterns: None,
            children: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.attributes.role = Some(role.into());
        self
    }

    pub fn with_dom_id(mut self, id: impl Into<String>) -> Self {
        self.attributes.id = Some(id.into());
        self
    }

    pub fn with_tab_index(mut self, tab_index: u32) -> Self {
        self.attributes.tab_index = Some(tab_index);
        self
    }

    /// Adds comma-joined css classes
    pub fn with_css_classes(mut self, classes: &str) -> Self {
        self.attributes.css_classes.extend(
            classes
                .split(',')
                .map(str::trim)
                .filter(|class| !class.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Sets comma-joined required patterns, parsed at [`build`](Self::build)
    pub fn with_authorization_patterns(mut self, patterns: impl Into<String>) -> Self {
        self.authorization_patterns = Some(patterns.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.attributes.enabled = enabled;
        self
    }

    pub fn with_icon(mut self, icon_identifier: impl Into<String>) -> Self {
        self.attributes.icon_identifier = Some(icon_identifier.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.attributes.href = Some(href.into());
        self
    }

    pub fn with_text(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.attributes.texts.insert(language.into(), text.into());
        self
    }

    /// Appends a child; only menus accept children
    pub fn with_child(mut self, child: NavNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> Result<NavNode> {
        match self.kind {
            NodeKind::Menu => self.build_menu().map(NavNode::Menu),
            NodeKind::MenuItem => {
                if !self.children.is_empty() {
                    return Err(NavigationError::InvalidStructure(format!(
                        "menu item [{}] cannot have children",
                        self.attributes.id.as_deref().unwrap_or("<no id>")
                    )));
                }
                Ok(NavNode::MenuItem(MenuItem {
                    attributes: self.finish_attributes()?,
                }))
            }
            NodeKind::Separator => Ok(NavNode::Separator),
        }
    }

    /// Builds a [`Menu`] directly, e.g. for a tree root
    pub fn build_menu(self) -> Result<Menu> {
        if self.kind != NodeKind::Menu {
            return Err(NavigationError::InvalidStructure(
                "only menu builders can produce a menu".to_string(),
            ));
        }
        let mut builder = self;
        let children = std::mem::take(&mut builder.children);
        Ok(Menu {
            attributes: builder.finish_attributes()?,
            children,
        })
    }

    fn finish_attributes(self) -> Result<LinkAttributes> {
        let mut attributes = self.attributes;
        attributes.required_patterns =
            PatternSet::parse_optional(self.authorization_patterns.as_deref())?;

        if attributes.icon_identifier.is_some() {
            attributes.css_classes.push(ICON_FIXED_WIDTH_CSS_CLASS.to_string());
        }
        if !attributes.enabled {
            attributes.css_classes.push(DISABLED_CSS_CLASS.to_string());
        }

        let mut seen = Vec::with_capacity(attributes.css_classes.len());
        attributes.css_classes.retain(|class| {
            if seen.contains(class) {
                false
            } else {
                seen.push(class.clone());
                true
            }
        });

        Ok(attributes)
    }
}
