//! Template persistence: files per organisation, or memory

use async_trait::async_trait;
use mithlond_core::DeploymentConfig;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{NavigationError, Result};
use crate::structure::MenuStructure;

/// File holding an organisation's navigation template
pub const TEMPLATE_FILE_NAME: &str = "menu_structure.json";

const NAVIGATION_DIR: &str = "navigation";

/// Persistence for navigation templates of one environment
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Environment this source serves
    fn environment(&self) -> &str;

    /// Loads the template of an organisation
    ///
    /// Fails with [`NavigationError::UnknownOrganisation`] if none exists.
    async fn load(&self, organisation: &str) -> Result<MenuStructure>;

    /// Stores a template, replacing any previous one
    async fn store(&self, structure: &MenuStructure) -> Result<()>;
}

fn check_organisation(organisation: &str) -> Result<()> {
    let invalid = organisation.trim().is_empty()
        || organisation.contains(['/', '\\'])
        || organisation == "."
        || organisation == "..";
    if invalid {
        return Err(NavigationError::UnknownOrganisation(organisation.to_string()));
    }
    Ok(())
}

/// Reads templates from
/// `<storage_root>/<environment>/<organisation>/navigation/menu_structure.json`
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    environment: String,
    environment_root: PathBuf,
}

impl FileTemplateSource {
    /// Creates a source for the configured environment
    pub fn new(config: &DeploymentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            environment: config.environment.clone(),
            environment_root: config.environment_root(),
        })
    }

    /// Location of an organisation's template file
    pub fn template_path(&self, organisation: &str) -> PathBuf {
        self.environment_root
            .join(organisation)
            .join(NAVIGATION_DIR)
            .join(TEMPLATE_FILE_NAME)
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    fn environment(&self) -> &str {
        &self.environment
    }

    async fn load(&self, organisation: &str) -> Result<MenuStructure> {
        check_organisation(organisation)?;
        let path = self.template_path(organisation);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(NavigationError::UnknownOrganisation(organisation.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let structure: MenuStructure = serde_json::from_str(&content)?;
        if structure.organisation_name() != organisation {
            return Err(NavigationError::InvalidStructure(format!(
                "template at {} belongs to organisation [{}], expected [{}]",
                path.display(),
                structure.organisation_name(),
                organisation
            )));
        }

        debug!(organisation, path = %path.display(), "Loaded navigation template");
        Ok(structure)
    }

    async fn store(&self, structure: &MenuStructure) -> Result<()> {
        let organisation = structure.organisation_name();
        check_organisation(organisation)?;

        let path = self.template_path(organisation);
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.environment_root.clone());
        tokio::fs::create_dir_all(&directory).await?;

        let content = serde_json::to_vec_pretty(structure)?;
        let target = path.clone();
        // Each write stages in its own file, then renames over the template
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut staging = tempfile::NamedTempFile::new_in(&directory)?;
            staging.write_all(&content)?;
            staging.as_file().sync_all()?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| NavigationError::Io(std::io::Error::new(ErrorKind::Other, e)))??;

        debug!(organisation, path = %path.display(), "Stored navigation template");
        Ok(())
    }
}

/// In-memory template source
pub struct InMemoryTemplateSource {
    environment: String,
    templates: Arc<RwLock<HashMap<String, MenuStructure>>>,
    loads: AtomicUsize,
}

impl InMemoryTemplateSource {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            templates: Arc::new(RwLock::new(HashMap::new())),
            loads: AtomicUsize::new(0),
        }
    }

    /// Creates a source pre-populated with templates
    pub fn from_structures(
        environment: impl Into<String>,
        structures: impl IntoIterator<Item = MenuStructure>,
    ) -> Self {
        let templates = structures
            .into_iter()
            .map(|structure| (structure.organisation_name().to_string(), structure))
            .collect();
        Self {
            environment: environment.into(),
            templates: Arc::new(RwLock::new(templates)),
            loads: AtomicUsize::new(0),
        }
    }

    /// Adds or replaces a template without going through a cache
    pub async fn insert(&self, structure: MenuStructure) {
        let mut templates = self.templates.write().await;
        templates.insert(structure.organisation_name().to_string(), structure);
    }

    pub async fn remove(&self, organisation: &str) -> Option<MenuStructure> {
        let mut templates = self.templates.write().await;
        templates.remove(organisation)
    }

    /// Number of successful and failed `load` calls so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TemplateSource for InMemoryTemplateSource {
    fn environment(&self) -> &str {
        &self.environment
    }

    async fn load(&self, organisation: &str) -> Result<MenuStructure> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        let templates = self.templates.read().await;
        templates
            .get(organisation)
            .cloned()
            .ok_or_else(|| NavigationError::UnknownOrganisation(organisation.to_string()))
    }

    async fn store(&self, structure: &MenuStructure) -> Result<()> {
        check_organisation(structure.organisation_name())?;
        self.insert(structure.clone()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NavNode;

    fn structure(organisation: &str) -> MenuStructure {
        let root = NavNode::menu()
            .with_dom_id("root")
            .with_child(
                NavNode::menu_item()
                    .with_href("calendar")
                    .with_authorization_patterns("/forodrim/members")
                    .build()
                    .unwrap(),
            )
            .build_menu()
            .unwrap();
        MenuStructure::new(organisation, root)
    }

    #[tokio::test]
    async fn test_file_source_round_trip() {
        let storage = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(storage.path().join("development")).unwrap();
        let config = DeploymentConfig::new("development", storage.path());
        let source = FileTemplateSource::new(&config).unwrap();

        assert!(matches!(
            source.load("Foo").await,
            Err(NavigationError::UnknownOrganisation(_))
        ));

        source.store(&structure("Foo")).await.unwrap();
        assert!(source.template_path("Foo").exists());

        let loaded = source.load("Foo").await.unwrap();
        assert_eq!(loaded, structure("Foo"));
        assert_eq!(source.environment(), "development");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stores_all_succeed() {
        let storage = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(storage.path().join("development")).unwrap();
        let source = Arc::new(
            FileTemplateSource::new(&DeploymentConfig::new("development", storage.path()))
                .unwrap(),
        );

        for _ in 0..50 {
            let writers: Vec<_> = (0..2)
                .map(|_| {
                    let source = Arc::clone(&source);
                    tokio::spawn(async move { source.store(&structure("Foo")).await })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }
        }

        assert_eq!(source.load("Foo").await.unwrap(), structure("Foo"));
        let navigation_dir = source.template_path("Foo").parent().unwrap().to_path_buf();
        let files: Vec<_> = std::fs::read_dir(navigation_dir).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_file_source_rejects_traversal() {
        let storage = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(storage.path().join("development")).unwrap();
        let source =
            FileTemplateSource::new(&DeploymentConfig::new("development", storage.path())).unwrap();

        for organisation in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                source.load(organisation).await,
                Err(NavigationError::UnknownOrganisation(_))
            ));
        }
    }

    #[test]
    fn test_file_source_requires_environment_dir() {
        let storage = tempfile::tempdir().unwrap();
        let config = DeploymentConfig::new("missing", storage.path());
        assert!(matches!(
            FileTemplateSource::new(&config),
            Err(NavigationError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_organisation_mismatch() {
        let storage = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(storage.path().join("development")).unwrap();
        let source =
            FileTemplateSource::new(&DeploymentConfig::new("development", storage.path())).unwrap();

        source.store(&structure("Foo")).await.unwrap();
        let target = source.template_path("Bar");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::copy(source.template_path("Foo"), &target).unwrap();

        assert!(matches!(
            source.load("Bar").await,
            Err(NavigationError::InvalidStructure(_))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemoryTemplateSource::from_structures("staging", vec![structure("Foo")]);

        assert_eq!(source.load("Foo").await.unwrap(), structure("Foo"));
        assert!(source.load("Bar").await.is_err());
        assert_eq!(source.load_count(), 2);

        source.store(&structure("Bar")).await.unwrap();
        assert!(source.load("Bar").await.is_ok());
        assert!(source.remove("Bar").await.is_some());
    }
}
