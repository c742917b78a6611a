//! Authorization decisions
//!
//! The [`Authorizer`] answers one question: does any possessed path satisfy
//! any required pattern? Both sets are expected to be small, so the check
//! is a plain nested scan without indexing.

use tracing::{debug, warn};

use crate::error::{AuthzError, Result};
use crate::pattern::{Matcher, PatternSet};
use crate::permission::PermissionSet;

/// Decides whether possessed paths satisfy required patterns
pub trait Authorizer: Send + Sync {
    /// Returns `true` if access is granted
    ///
    /// - an empty `required` set is unrestricted and always grants;
    /// - otherwise an empty `possessed` set never grants;
    /// - otherwise grants iff some pattern matches some path.
    fn is_authorized(&self, required: &PatternSet, possessed: &PermissionSet) -> bool;

    /// Strict variant of [`is_authorized`](Authorizer::is_authorized)
    ///
    /// Used by write-oriented call sites that must abort rather than
    /// degrade. The error carries both sets and `operation` for auditing.
    fn validate(
        &self,
        required: &PatternSet,
        possessed: &PermissionSet,
        operation: &str,
    ) -> Result<()> {
        if self.is_authorized(required, possessed) {
            return Ok(());
        }

        warn!(
            operation,
            required = %required,
            possessed = %possessed,
            "Authorization validation failed"
        );
        Err(AuthzError::Unauthorized {
            operation: operation.to_string(),
            required: required.clone(),
            possessed: possessed.clone(),
        })
    }

    /// Parses a comma-joined pattern list, then checks it
    fn is_authorized_str(&self, required: &str, possessed: &PermissionSet) -> Result<bool> {
        let required = PatternSet::parse(required)?;
        Ok(self.is_authorized(&required, possessed))
    }

    /// Parses a comma-joined pattern list, then validates it
    fn validate_str(
        &self,
        required: &str,
        possessed: &PermissionSet,
        operation: &str,
    ) -> Result<()> {
        let required = PatternSet::parse(required)?;
        self.validate(&required, possessed, operation)
    }
}

/// Stateless [`Authorizer`] implementing the any-pattern/any-path rule
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAuthorizer;

impl SimpleAuthorizer {
    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for SimpleAuthorizer {
    fn is_authorized(&self, required: &PatternSet, possessed: &PermissionSet) -> bool {
        if required.is_empty() {
            return true;
        }
        if possessed.is_empty() {
            debug!(required = %required, "No possessed paths for restricted check");
            return false;
        }

        possessed.iter().any(|path| required.matches(path))
    }
}
