//! Per-caller redaction of navigation templates
//!
//! The [`Redactor`] walks a template top-down and emits a new tree with the
//! same node count, order and nesting. Nodes the caller is not authorized
//! for keep their position but lose their `href`, are disabled and gain the
//! `disabled` css class. A menu's children are always visited, whatever the
//! outcome for the menu itself, so every caller sees the same layout.
//!
//! Redaction is synchronous and never fails: an unauthorized node degrades
//! instead of aborting the rendering of the whole tree.

use mithlond_authz::{Authorizer, PatternSet, PermissionSet, SimpleAuthorizer};
use tracing::{debug, trace};

use crate::node::{LinkAttributes, Menu, MenuItem, NavNode, DISABLED_CSS_CLASS};
use crate::structure::MenuStructure;

static SIMPLE_AUTHORIZER: SimpleAuthorizer = SimpleAuthorizer;

/// Css class stripped from unauthorized copies
const ENABLED_CSS_CLASS: &str = "enabled";

/// Counters collected during one redaction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactionSummary {
    /// Nodes visited, separators included
    pub visited: usize,
    /// Nodes carrying at least one required pattern
    pub restricted: usize,
    /// Restricted nodes the caller was not authorized for
    pub redacted: usize,
}

/// Produces caller-specific copies of navigation templates
pub struct Redactor<'a, A: Authorizer + ?Sized = SimpleAuthorizer> {
    authorizer: &'a A,
    possessed: &'a PermissionSet,
}

impl<'a> Redactor<'a, SimpleAuthorizer> {
    /// Creates a redactor using the [`SimpleAuthorizer`]
    pub fn new(possessed: &'a PermissionSet) -> Self {
        Self {
            authorizer: &SIMPLE_AUTHORIZER,
            possessed,
        }
    }
}

impl<'a, A: Authorizer + ?Sized> Redactor<'a, A> {
    /// Creates a redactor deciding through a custom [`Authorizer`]
    pub fn with_authorizer(authorizer: &'a A, possessed: &'a PermissionSet) -> Self {
        Self {
            authorizer,
            possessed,
        }
    }

    /// Redacts a single node and its subtree
    pub fn redact(&self, node: &NavNode) -> NavNode {
        let mut summary = RedactionSummary::default();
        self.redact_node(node, &mut summary)
    }

    /// Redacts a whole menu tree
    pub fn redact_menu(&self, menu: &Menu) -> Menu {
        let (redacted, summary) = self.redact_with_summary(menu);
        debug!(
            visited = summary.visited,
            restricted = summary.restricted,
            redacted = summary.redacted,
            possessed = %self.possessed,
            "Redacted navigation tree"
        );
        redacted
    }

    /// Redacts the root menu of an organisation's structure
    pub fn redact_structure(&self, structure: &MenuStructure) -> MenuStructure {
        MenuStructure::new(
            structure.organisation_name(),
            self.redact_menu(structure.root_menu()),
        )
    }

    /// Redacts a menu tree and reports what happened
    pub fn redact_with_summary(&self, menu: &Menu) -> (Menu, RedactionSummary) {
        let mut summary = RedactionSummary::default();
        let redacted = self.redact_menu_node(menu, &mut summary);
        (redacted, summary)
    }

    fn redact_node(&self, node: &NavNode, summary: &mut RedactionSummary) -> NavNode {
        match node {
            NavNode::Menu(menu) => NavNode::Menu(self.redact_menu_node(menu, summary)),
            NavNode::MenuItem(item) => NavNode::MenuItem(MenuItem {
                attributes: self.redact_attributes(&item.attributes, summary),
            }),
            NavNode::Separator => {
                summary.visited += 1;
                NavNode::Separator
            }
        }
    }

    fn redact_menu_node(&self, menu: &Menu, summary: &mut RedactionSummary) -> Menu {
        let attributes = self.redact_attributes(&menu.attributes, summary);
        let children = menu
            .children
            .iter()
            .map(|child| self.redact_node(child, summary))
            .collect();
        Menu {
            attributes,
            children,
        }
    }

    fn redact_attributes(
        &self,
        template: &LinkAttributes,
        summary: &mut RedactionSummary,
    ) -> LinkAttributes {
        summary.visited += 1;

        let mut copy = template.clone();
        // Policy stays with the template
        copy.required_patterns = PatternSet::new();

        if template.required_patterns.is_empty() {
            return copy;
        }
        summary.restricted += 1;

        if self.authorizer.is_authorized(&template.required_patterns, self.possessed) {
            trace!(id = ?template.id, required = %template.required_patterns, "Node authorized");
            return copy;
        }

        trace!(id = ?template.id, required = %template.required_patterns, "Node redacted");
        summary.redacted += 1;

        copy.enabled = false;
        copy.href = None;
        copy.css_classes.retain(|class| !class.eq_ignore_ascii_case(ENABLED_CSS_CLASS));
        if !copy.css_classes.iter().any(|class| class == DISABLED_CSS_CLASS) {
            copy.css_classes.push(DISABLED_CSS_CLASS.to_string());
        }
        copy
    }
}
