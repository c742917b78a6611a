//! Authorization pattern module
//!
//! Provides compiled 3-segment glob-style patterns, the parser for
//! concatenated pattern lists and the [`Matcher`] abstraction used by the
//! authorizer.
//!
//! # Examples
//!
//! ```
//! use mithlond_authz::{AuthorizationPath, AuthorizationPattern, Matcher};
//!
//! let pattern = AuthorizationPattern::parse_single("/realmA").unwrap();
//! assert_eq!(pattern.to_string(), "realmA/*/*");
//!
//! let path = AuthorizationPath::parse("realmA/council/chair").unwrap();
//! assert!(pattern.matches(&path));
//! ```

mod set;
mod types;


pub use set::PatternSet;
pub use types::{AuthorizationPattern, Matcher, SegmentPattern};
