use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use super::model::{ModDescriptor, ModsMap, ResolvedMod};
use super::mods::validate_catalog;
use crate::core::error::SiteResult;
use crate::core::modrinth::{select_release, CompatibilityFilter, ModCatalog};

/// Resolves every configured mod against the external catalog.
pub struct ModResolver {
    catalog: Arc<dyn ModCatalog>,
    mods: Vec<ModDescriptor>,
    filter: CompatibilityFilter,
    /// Maximum number of catalog queries in flight.
    concurrency: usize,
}

impl ModResolver {
    pub fn new(
        catalog: Arc<dyn ModCatalog>,
        mods: Vec<ModDescriptor>,
        filter: CompatibilityFilter,
    ) -> Self {
        Self {
            catalog,
            mods,
            filter,
            concurrency: 8,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Build the id → resolved mod mapping.
    ///
    /// Fails only when the catalog itself is invalid. A mod whose lookup
    /// fails is reported as unavailable and never affects the others.
    pub async fn resolve(&self) -> SiteResult<ModsMap> {
        validate_catalog(&self.mods)?;

        info!(
            "Refreshing metadata for {} mods ({} {})",
            self.mods.len(),
            self.filter.loader,
            self.filter.game_version
        );

        let resolved: Vec<ResolvedMod> = stream::iter(self.mods.iter().copied())
            .map(|descriptor| self.resolve_one(descriptor))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let available = resolved.iter().filter(|m| m.is_available()).count();
        info!("Resolved {}/{} mods", available, resolved.len());

        Ok(resolved
            .into_iter()
            .map(|m| (m.id().to_string(), m))
            .collect())
    }

    async fn resolve_one(&self, descriptor: ModDescriptor) -> ResolvedMod {
        let versions = match self
            .catalog
            .project_versions(descriptor.slug, &self.filter)
            .await
        {
            Ok(versions) => versions,
            Err(e) => {
                warn!("Lookup failed for {}: {}", descriptor.slug, e);
                return ResolvedMod::unavailable(descriptor);
            }
        };

        match select_release(versions) {
            Some(release) => ResolvedMod::available(descriptor, release),
            None => {
                info!(
                    "No {} release of {} for {}",
                    self.filter.loader, descriptor.slug, self.filter.game_version
                );
                ResolvedMod::unavailable(descriptor)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::catalog::{Category, LoaderType, MODS};
    use crate::core::error::SiteError;
    use crate::core::modrinth::{CatalogFile, CatalogVersion};

    /// In-memory catalog that counts queries.
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        releases: Mutex<HashMap<String, Vec<CatalogVersion>>>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeCatalog {
        pub(crate) fn with_release(self, slug: &str, version: &str) -> Self {
            self.releases.lock().unwrap().insert(
                slug.to_string(),
                vec![CatalogVersion {
                    version_number: version.to_string(),
                    date_published: None,
                    files: vec![CatalogFile {
                        url: format!("https://cdn.example/{}.jar", slug),
                        filename: format!("{}.jar", slug),
                        primary: true,
                    }],
                }],
            );
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModCatalog for FakeCatalog {
        async fn project_versions(
            &self,
            slug: &str,
            _filter: &CompatibilityFilter,
        ) -> SiteResult<Vec<CatalogVersion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if slug == "offline" {
                return Err(SiteError::UpstreamStatus {
                    url: format!("https://api.example/{}", slug),
                    status: 502,
                });
            }
            Ok(self
                .releases
                .lock()
                .unwrap()
                .get(slug)
                .cloned()
                .unwrap_or_default())
        }
    }

    pub(crate) fn filter() -> CompatibilityFilter {
        CompatibilityFilter {
            game_version: "1.21.11".into(),
            loader: LoaderType::Fabric,
        }
    }

    #[tokio::test]
    async fn every_configured_mod_gets_exactly_one_entry() {
        let catalog = Arc::new(
            FakeCatalog::default()
                .with_release("fabric-api", "0.140.0+1.21.11")
                .with_release("sodium", "mc1.21.11-0.8.0"),
        );
        let resolver = ModResolver::new(catalog.clone(), MODS.to_vec(), filter());

        let mods = resolver.resolve().await.unwrap();

        assert_eq!(mods.len(), MODS.len());
        assert!(MODS.iter().all(|d| mods.contains_key(d.id)));
        assert_eq!(catalog.calls(), MODS.len());

        let sodium = &mods["sodium"];
        assert!(sodium.is_available());
        assert_eq!(sodium.release().unwrap().version, "mc1.21.11-0.8.0");
        assert_eq!(sodium.release().unwrap().filename, "sodium.jar");

        let iris = &mods["iris"];
        assert!(!iris.is_available());
        assert!(iris.release().is_none());
    }

    #[tokio::test]
    async fn failing_lookup_only_affects_its_own_mod() {
        let mods = vec![
            ModDescriptor::new("base", "Base", "base", Category::Core),
            ModDescriptor::new("flaky", "Flaky", "offline", Category::Utility).with_deps(&["base"]),
        ];
        let catalog = Arc::new(FakeCatalog::default().with_release("base", "1.0"));
        let resolver = ModResolver::new(catalog, mods, filter()).with_concurrency(1);

        let resolved = resolver.resolve().await.unwrap();

        assert!(resolved["base"].is_available());
        assert!(!resolved["flaky"].is_available());
    }

    #[tokio::test]
    async fn invalid_catalog_fails_the_whole_resolution() {
        let mods = vec![
            ModDescriptor::new("iris", "Iris", "iris", Category::Visuals).with_deps(&["sodium"]),
        ];
        let catalog = Arc::new(FakeCatalog::default());
        let resolver = ModResolver::new(catalog.clone(), mods, filter());

        let err = resolver.resolve().await.unwrap_err();

        assert!(matches!(err, SiteError::Catalog(_)));
        assert_eq!(catalog.calls(), 0);
    }
}
