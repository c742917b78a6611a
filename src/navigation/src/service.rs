//! Navigation service
//!
//! Read path: look up the organisation's template through the
//! [`TemplateCache`] and redact it for the caller's paths. Write path:
//! strictly validate that the caller may administer the organisation, then
//! store and publish the new template.

use mithlond_authz::{
    AuthorizationPattern, Authorizer, PathProducer, PatternSet, PermissionSet, SimpleAuthorizer,
    WILDCARD,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{NavigationError, Result};
use crate::redactor::Redactor;
use crate::structure::MenuStructure;
use crate::template::{TemplateCache, TemplateSource};

/// Serves per-caller navigation menus
pub struct NavigationService<A: Authorizer = SimpleAuthorizer> {
    cache: TemplateCache,
    authorizer: A,
}

impl NavigationService<SimpleAuthorizer> {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self::with_authorizer(source, SimpleAuthorizer::new())
    }
}

impl<A: Authorizer> NavigationService<A> {
    pub fn with_authorizer(source: Arc<dyn TemplateSource>, authorizer: A) -> Self {
        Self {
            cache: TemplateCache::new(source),
            authorizer,
        }
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Redacted navigation of `organisation` for the caller
    ///
    /// The caller's paths are the union of every producer's paths.
    #[instrument(skip(self, producers))]
    pub async fn menu_structure<I>(&self, organisation: &str, producers: I) -> Result<MenuStructure>
    where
        I: IntoIterator,
        I::Item: PathProducer,
    {
        if organisation.trim().is_empty() {
            return Err(NavigationError::UnknownOrganisation(organisation.to_string()));
        }
        let possessed = PermissionSet::from_producers(producers);

        let template = self.cache.get_or_load(organisation).await?;
        Ok(Redactor::with_authorizer(&self.authorizer, &possessed).redact_structure(&template))
    }

    /// Replaces the navigation template of an organisation
    ///
    /// The caller must possess a path matching `<organisation>/*/*`.
    #[instrument(skip_all, fields(organisation = %structure.organisation_name()))]
    pub async fn create_or_update<I>(
        &self,
        structure: MenuStructure,
        producers: I,
    ) -> Result<Arc<MenuStructure>>
    where
        I: IntoIterator,
        I::Item: PathProducer,
    {
        let organisation = structure.organisation_name();
        if organisation.trim().is_empty() {
            return Err(NavigationError::InvalidStructure(
                "organisation name cannot be empty".to_string(),
            ));
        }

        let required = PatternSet::single(AuthorizationPattern::realm_and_group(
            organisation,
            WILDCARD,
        )?);
        let possessed = PermissionSet::from_producers(producers);
        self.authorizer.validate(
            &required,
            &possessed,
            &format!(
                "MenuStructure for organisation [{}] could not be created/updated",
                organisation
            ),
        )?;

        let published = self.cache.publish(structure).await?;
        info!(
            organisation = %published.organisation_name(),
            nodes = published.root_menu().node_count(),
            "Navigation template updated"
        );
        Ok(published)
    }
}
