//! Error types for navigation templates and redaction

use mithlond_authz::AuthzError;
use mithlond_core::CoreError;
use thiserror::Error;

/// Navigation errors
///
/// Redaction itself never fails; these come from building, loading and
/// publishing templates.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No template exists for the organisation
    #[error("Unknown organisation: [{0}]")]
    UnknownOrganisation(String),

    /// Pattern/path parsing or strict authorization failure
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Structurally invalid navigation tree
    #[error("Invalid navigation structure: {0}")]
    InvalidStructure(String),

    /// Template document could not be (de)serialized
    #[error("Template format error: {0}")]
    TemplateFormat(#[from] serde_json::Error),

    /// Deployment configuration problem
    #[error(transparent)]
    Configuration(#[from] CoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NavigationError {
    /// Whether the caller lacked authorization for a strict operation
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authz(AuthzError::Unauthorized { .. }))
    }
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
