//! Published templates keyed by organisation and environment

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::source::TemplateSource;
use crate::error::Result;
use crate::structure::MenuStructure;

/// Cache key: an organisation within a deployment environment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    pub organisation: String,
    pub environment: String,
}

impl TemplateKey {
    pub fn new(organisation: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            organisation: organisation.into(),
            environment: environment.into(),
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.organisation, self.environment)
    }
}

#[derive(Debug, Clone)]
struct CachedTemplate {
    structure: Arc<MenuStructure>,
    loaded_at: DateTime<Utc>,
    /// Taken before the source was read; higher is newer
    generation: u64,
}

impl CachedTemplate {
    fn new(structure: Arc<MenuStructure>, generation: u64) -> Self {
        Self {
            structure,
            loaded_at: Utc::now(),
            generation,
        }
    }
}

/// Published navigation templates
///
/// Entries are replaced whole; a reader holding an `Arc` keeps the tree it
/// got even if a newer one is published meanwhile. A failed load never
/// evicts the previously published template, and a slow load never
/// replaces a template published after that load started.
pub struct TemplateCache {
    source: Arc<dyn TemplateSource>,
    entries: DashMap<TemplateKey, CachedTemplate>,
    generation: AtomicU64,
    publish_locks: DashMap<TemplateKey, Arc<Mutex<()>>>,
}

impl TemplateCache {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        Self {
            source,
            entries: DashMap::new(),
            generation: AtomicU64::new(0),
            publish_locks: DashMap::new(),
        }
    }

    /// Environment of the underlying source
    pub fn environment(&self) -> &str {
        self.source.environment()
    }

    pub fn source(&self) -> &Arc<dyn TemplateSource> {
        &self.source
    }

    fn key(&self, organisation: &str) -> TemplateKey {
        TemplateKey::new(organisation, self.environment())
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Installs `structure` unless a newer entry is already cached
    ///
    /// Returns the structure now being served.
    fn install(
        &self,
        key: TemplateKey,
        structure: Arc<MenuStructure>,
        generation: u64,
    ) -> Arc<MenuStructure> {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().generation > generation {
                    debug!(key = %occupied.key(), "Newer template already published");
                    return Arc::clone(&occupied.get().structure);
                }
                occupied.insert(CachedTemplate::new(Arc::clone(&structure), generation));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CachedTemplate::new(Arc::clone(&structure), generation));
            }
        }
        structure
    }

    /// Published template, loading it from the source on first use
    pub async fn get_or_load(&self, organisation: &str) -> Result<Arc<MenuStructure>> {
        let key = self.key(organisation);
        if let Some(cached) = self.entries.get(&key) {
            debug!(key = %key, "Template cache hit");
            return Ok(Arc::clone(&cached.structure));
        }

        debug!(key = %key, "Template cache miss");
        let generation = self.next_generation();
        let structure = Arc::new(self.source.load(organisation).await?);
        Ok(self.install(key, structure, generation))
    }

    /// Reloads a template from the source
    ///
    /// Returns the template now being served, which is a newer published
    /// one if a publication overtook this reload. On failure the
    /// previously published template stays in place and the error is
    /// returned.
    pub async fn reload(&self, organisation: &str) -> Result<Arc<MenuStructure>> {
        let key = self.key(organisation);
        let generation = self.next_generation();
        match self.source.load(organisation).await {
            Ok(structure) => {
                let served = self.install(key.clone(), Arc::new(structure), generation);
                info!(key = %key, "Reloaded navigation template");
                Ok(served)
            }
            Err(e) => {
                warn!(
                    key = %key,
                    kept_previous = self.entries.contains_key(&key),
                    error = %e,
                    "Failed to reload navigation template"
                );
                Err(e)
            }
        }
    }

    /// Stores a template through the source, then publishes it
    ///
    /// Publications of the same organisation are serialised, so the cache
    /// always ends up serving what the source stored last.
    pub async fn publish(&self, structure: MenuStructure) -> Result<Arc<MenuStructure>> {
        let key = self.key(structure.organisation_name());
        let lock = Arc::clone(&self.publish_locks.entry(key.clone()).or_default());
        let _guard = lock.lock().await;

        self.source.store(&structure).await?;
        let generation = self.next_generation();
        let published = self.install(key.clone(), Arc::new(structure), generation);
        info!(key = %key, "Published navigation template");
        Ok(published)
    }

    /// Drops a cached template; returns whether one was cached
    pub fn invalidate(&self, organisation: &str) -> bool {
        self.entries.remove(&self.key(organisation)).is_some()
    }

    /// When the cached template was loaded or published
    pub fn loaded_at(&self, organisation: &str) -> Option<DateTime<Utc>> {
        self.entries
            .get(&self.key(organisation))
            .map(|cached| cached.loaded_at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigationError;
    use crate::node::NavNode;
    use crate::template::InMemoryTemplateSource;

    fn structure(organisation: &str, root_id: &str) -> MenuStructure {
        let root = NavNode::menu().with_dom_id(root_id).build_menu().unwrap();
        MenuStructure::new(organisation, root)
    }

    fn root_id(structure: &MenuStructure) -> Option<&str> {
        structure.root_menu().attributes().id()
    }

    #[tokio::test]
    async fn test_get_or_load_caches() {
        let source = Arc::new(InMemoryTemplateSource::from_structures(
            "development",
            vec![structure("Foo", "first")],
        ));
        let cache = TemplateCache::new(source.clone());

        let first = cache.get_or_load("Foo").await.unwrap();
        let second = cache.get_or_load("Foo").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.load_count(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.loaded_at("Foo").is_some());
    }

    #[tokio::test]
    async fn test_unknown_organisation_not_cached() {
        let source = Arc::new(InMemoryTemplateSource::new("development"));
        let cache = TemplateCache::new(source);

        assert!(matches!(
            cache.get_or_load("Nope").await,
            Err(NavigationError::UnknownOrganisation(_))
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_reload_swaps_and_failure_keeps_previous() {
        let source = Arc::new(InMemoryTemplateSource::from_structures(
            "development",
            vec![structure("Foo", "first")],
        ));
        let cache = TemplateCache::new(source.clone());
        let held = cache.get_or_load("Foo").await.unwrap();

        source.insert(structure("Foo", "second")).await;
        let reloaded = cache.reload("Foo").await.unwrap();
        assert_eq!(root_id(&reloaded), Some("second"));
        assert_eq!(root_id(&held), Some("first"));

        source.remove("Foo").await;
        assert!(cache.reload("Foo").await.is_err());
        let current = cache.get_or_load("Foo").await.unwrap();
        assert_eq!(root_id(&current), Some("second"));
    }

    #[tokio::test]
    async fn test_publish_and_invalidate() {
        let source = Arc::new(InMemoryTemplateSource::new("development"));
        let cache = TemplateCache::new(source.clone());

        let published = cache.publish(structure("Foo", "first")).await.unwrap();
        assert_eq!(root_id(&published), Some("first"));
        assert_eq!(source.load("Foo").await.unwrap(), *published);

        assert!(cache.invalidate("Foo"));
        assert!(!cache.invalidate("Foo"));
        assert!(cache.is_empty());
    }

    /// Source whose loads read immediately but return only once released
    struct GatedSource {
        inner: InMemoryTemplateSource,
        read: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait::async_trait]
    impl TemplateSource for GatedSource {
        fn environment(&self) -> &str {
            self.inner.environment()
        }

        async fn load(&self, organisation: &str) -> Result<MenuStructure> {
            let loaded = self.inner.load(organisation).await;
            self.read.notify_one();
            self.release.notified().await;
            loaded
        }

        async fn store(&self, structure: &MenuStructure) -> Result<()> {
            self.inner.store(structure).await
        }
    }

    #[tokio::test]
    async fn test_slow_reload_does_not_replace_newer_publication() {
        let source = Arc::new(GatedSource {
            inner: InMemoryTemplateSource::from_structures(
                "development",
                vec![structure("Foo", "old")],
            ),
            read: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let cache = Arc::new(TemplateCache::new(source.clone()));

        let reloading = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.reload("Foo").await }
        });
        source.read.notified().await;

        let published = cache.publish(structure("Foo", "new")).await.unwrap();
        assert_eq!(root_id(&published), Some("new"));

        source.release.notify_one();
        let reloaded = reloading.await.unwrap().unwrap();
        assert_eq!(root_id(&reloaded), Some("new"));

        let stored = source.inner.load("Foo").await.unwrap();
        assert_eq!(root_id(&stored), Some("new"));
        let served = cache.get_or_load("Foo").await.unwrap();
        assert_eq!(root_id(&served), Some("new"));
    }

    #[tokio::test]
    async fn test_reload_after_publication_replaces() {
        let source = Arc::new(InMemoryTemplateSource::new("development"));
        let cache = TemplateCache::new(source.clone());

        cache.publish(structure("Foo", "first")).await.unwrap();
        source.insert(structure("Foo", "edited")).await;

        let reloaded = cache.reload("Foo").await.unwrap();
        assert_eq!(root_id(&reloaded), Some("edited"));
        let served = cache.get_or_load("Foo").await.unwrap();
        assert!(Arc::ptr_eq(&reloaded, &served));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(TemplateKey::new("Foo", "staging").to_string(), "Foo@staging");
    }
}
