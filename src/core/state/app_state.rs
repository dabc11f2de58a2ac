use std::sync::Arc;

use crate::core::archive::ArchiveBuilder;
use crate::core::catalog::{MetadataCache, ModDescriptor, ModResolver, MODS};
use crate::core::error::SiteResult;
use crate::core::http::build_http_client;
use crate::core::modrinth::{CompatibilityFilter, ModCatalog, ModrinthClient};
use crate::core::state::SiteConfig;
use crate::core::stats::StatsProxy;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub mods: Arc<MetadataCache>,
    pub stats: Arc<StatsProxy>,
    pub archiver: Arc<ArchiveBuilder>,
}

impl AppState {
    /// Wire the production services: the shipped catalog resolved
    /// against Modrinth.
    pub fn new(config: SiteConfig) -> SiteResult<Self> {
        let http_client = build_http_client()?;
        let catalog = Arc::new(ModrinthClient::new(
            http_client.clone(),
            config.modrinth_api_url.clone(),
            config.catalog_timeout,
        ));
        Self::with_catalog(config, http_client, catalog, MODS.to_vec())
    }

    pub fn with_catalog(
        config: SiteConfig,
        http_client: reqwest::Client,
        catalog: Arc<dyn ModCatalog>,
        mods: Vec<ModDescriptor>,
    ) -> SiteResult<Self> {
        let filter = CompatibilityFilter {
            game_version: config.game_version.clone(),
            loader: config.loader,
        };
        let resolver =
            ModResolver::new(catalog, mods, filter).with_concurrency(config.resolve_concurrency);

        let stats = StatsProxy::new(
            http_client.clone(),
            config.stats_url.clone(),
            config.stats_token.clone(),
            config.stats_ttl,
            config.stats_timeout,
        );

        Ok(Self {
            mods: Arc::new(MetadataCache::new(resolver, config.mods_ttl)),
            stats: Arc::new(stats),
            archiver: Arc::new(
                ArchiveBuilder::new(http_client, config.download_timeout)
                    .with_spool_dir(config.spool_dir.clone()),
            ),
            config: Arc::new(config),
        })
    }
}
