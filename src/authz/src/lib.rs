//! # Mithlond Authorization
//!
//! Hierarchical authorization paths, glob-style authorization patterns and
//! the pure matching function deciding whether a caller's possessed paths
//! satisfy a set of required patterns.
//!
//! ## Concepts
//!
//! - **AuthorizationPath**: `realm/group/qualifier`, 1-3 literal segments
//!   possessed by a caller (typically one per group membership).
//! - **AuthorizationPattern**: exactly 3 segments, each a literal or the
//!   whole-segment wildcard `*`. Missing segments default to `*`.
//! - **PatternSet**: sorted, duplicate-free set of patterns. The empty set
//!   means "no restriction".
//! - **PermissionSet**: union of the paths returned by a caller's
//!   [`PathProducer`]s.
//!
//! ## Example
//!
//! ```rust
//! use mithlond_authz::{Authorizer, AuthorizationPath, PatternSet, PermissionSet, SimpleAuthorizer};
//!
//! let required = PatternSet::parse("/mithlond/members,/forodrim/members").unwrap();
//! let possessed: PermissionSet = [AuthorizationPath::parse("/forodrim/members/village_idiots").unwrap()]
//!     .into_iter()
//!     .collect();
//!
//! assert!(SimpleAuthorizer.is_authorized(&required, &possessed));
//! assert!(!SimpleAuthorizer.is_authorized(&required, &PermissionSet::new()));
//! ```

pub mod authorizer;
pub mod error;
pub mod path;
pub mod pattern;
pub mod permission;

// Re-export commonly used types
pub use authorizer::{Authorizer, SimpleAuthorizer};
pub use error::{AuthzError, Result};
pub use path::{AuthorizationPath, AuthorizationPathBuilder, Segment};
pub use pattern::{AuthorizationPattern, Matcher, PatternSet, SegmentPattern};
pub use permission::{FnProducer, GroupMembership, PathProducer, PermissionSet};

/// Separator between the segments of a path or pattern
pub const SEGMENT_SEPARATOR: char = '/';

/// Separator between entries of a concatenated path or pattern list
pub const LIST_SEPARATOR: char = ',';

/// Whole-segment wildcard marker
pub const WILDCARD: &str = "*";

/// Maximum number of segments in a path or pattern
pub const MAX_SEGMENTS: usize = 3;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
