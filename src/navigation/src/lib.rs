//! # Mithlond Navigation
//!
//! Navigation menus with per-caller redaction.
//!
//! A template [`MenuStructure`] is authored once per organisation and
//! environment. Each node may carry required authorization patterns. For
//! every request the [`Redactor`] walks the template and emits a new tree of
//! the exact same shape in which nodes the caller is not authorized for are
//! disabled, lose their `href` and gain the `disabled` css class.
//!
//! ## Example
//!
//! ```rust
//! use mithlond_authz::{AuthorizationPath, PermissionSet};
//! use mithlond_navigation::{NavNode, Redactor};
//!
//! let template = NavNode::menu()
//!     .with_dom_id("root")
//!     .with_child(
//!         NavNode::menu_item()
//!             .with_href("calendar")
//!             .with_authorization_patterns("/mithlond/members,/forodrim/members")
//!             .build()
//!             .unwrap(),
//!     )
//!     .build_menu()
//!     .unwrap();
//!
//! let anonymous = PermissionSet::new();
//! let redacted = Redactor::new(&anonymous).redact_menu(&template);
//! assert_eq!(redacted.children()[0].href(), None);
//!
//! let path = AuthorizationPath::parse("/forodrim/members/village_idiots").unwrap();
//! let member = PermissionSet::single(path);
//! let redacted = Redactor::new(&member).redact_menu(&template);
//! assert_eq!(redacted.children()[0].href(), Some("calendar"));
//! ```

pub mod error;
pub mod node;
pub mod redactor;
pub mod service;
pub mod structure;
pub mod template;

// Re-export commonly used types
pub use error::{NavigationError, Result};
pub use node::{LinkAttributes, Menu, MenuItem, NavNode, NavNodeBuilder, NodeKind};
pub use redactor::{RedactionSummary, Redactor};
pub use service::NavigationService;
pub use structure::MenuStructure;
pub use template::{
    FileTemplateSource, InMemoryTemplateSource, TemplateCache, TemplateKey, TemplateSource,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
