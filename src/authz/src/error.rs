//! Error types for authorization parsing and strict validation

use thiserror::Error;

use crate::pattern::PatternSet;
use crate::permission::PermissionSet;

/// Authorization errors
///
/// Parsing errors surface while templates or permissions are ingested,
/// never during matching. `Unauthorized` is only produced by the strict
/// [`Authorizer::validate`](crate::Authorizer::validate) entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// Path string could not be parsed
    #[error("Malformed authorization path [{input}]: {reason}")]
    MalformedPath { input: String, reason: String },

    /// Pattern string could not be parsed
    #[error("Malformed authorization pattern [{input}]: {reason}")]
    MalformedPattern { input: String, reason: String },

    /// Caller lacks every required pattern
    #[error(
        "Unauthorized: {operation}\n  Required AuthorizationPatterns: [{required}]\n  Possessed AuthorizationPaths : [{possessed}]"
    )]
    Unauthorized {
        operation: String,
        required: PatternSet,
        possessed: PermissionSet,
    },
}

impl AuthzError {
    pub(crate) fn malformed_path(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_pattern(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error stems from parsing rather than authorization
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::MalformedPath { .. } | Self::MalformedPattern { .. })
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
