use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use super::model::ModsMap;
use super::resolver::ModResolver;
use crate::core::cache::TtlCache;
use crate::core::error::SiteResult;

/// Resolver output memoized for the freshness window.
///
/// There is no stale fallback here: if a refresh fails, the caller gets
/// the error even when an older mapping is cached.
pub struct MetadataCache {
    resolver: ModResolver,
    cache: TtlCache<ModsMap>,
}

impl MetadataCache {
    pub fn new(resolver: ModResolver, ttl: Duration) -> Self {
        Self {
            resolver,
            cache: TtlCache::new(ttl),
        }
    }

    pub async fn get(&self) -> SiteResult<Arc<ModsMap>> {
        if let Some(mods) = self.cache.fresh().await {
            debug!("Serving cached mod metadata");
            return Ok(mods);
        }

        self.cache
            .get_or_refresh(|| self.resolver.resolve())
            .await
            .inspect_err(|e| error!("Mod metadata refresh failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::resolver::tests::{filter, FakeCatalog};
    use crate::core::catalog::{Category, ModDescriptor, MODS};
    use crate::core::error::SiteError;

    const TTL: Duration = Duration::from_secs(60 * 60);

    fn cache_over(catalog: Arc<FakeCatalog>) -> MetadataCache {
        MetadataCache::new(ModResolver::new(catalog, MODS.to_vec(), filter()), TTL)
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_reads_within_ttl_do_not_query_the_catalog() {
        let catalog = Arc::new(FakeCatalog::default().with_release("sodium", "0.8.0"));
        let cache = cache_over(catalog.clone());

        let first = cache.get().await.unwrap();
        let queries = catalog.calls();
        tokio::time::advance(TTL - Duration::from_secs(1)).await;
        let second = cache.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.calls(), queries);
        assert_eq!(
            serde_json::to_string(&*first).unwrap(),
            serde_json::to_string(&*second).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn expired_mapping_is_resolved_again() {
        let catalog = Arc::new(FakeCatalog::default());
        let cache = cache_over(catalog.clone());

        let first = cache.get().await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        let second = cache.get().await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.calls(), 2 * MODS.len());
    }

    #[tokio::test]
    async fn total_failure_is_reported_to_the_caller() {
        let mods = vec![ModDescriptor::new("dup", "Dup", "dup", Category::Core); 2];
        let catalog = Arc::new(FakeCatalog::default());
        let cache = MetadataCache::new(ModResolver::new(catalog, mods, filter()), TTL);

        let err = cache.get().await.unwrap_err();
        assert!(matches!(err, SiteError::Catalog(_)));
    }
}
