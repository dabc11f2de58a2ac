use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::version::CatalogVersion;
use crate::core::catalog::LoaderType;
use crate::core::error::{SiteError, SiteResult};

/// Compatibility key every catalog query is filtered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityFilter {
    pub game_version: String,
    pub loader: LoaderType,
}

impl CompatibilityFilter {
    /// Query parameters in the JSON-array form Modrinth expects.
    fn query(&self) -> [(&'static str, String); 2] {
        [
            ("game_versions", format!("[\"{}\"]", self.game_version)),
            ("loaders", format!("[\"{}\"]", self.loader)),
        ]
    }
}

/// Source of project versions for the metadata resolver.
#[async_trait]
pub trait ModCatalog: Send + Sync {
    async fn project_versions(
        &self,
        slug: &str,
        filter: &CompatibilityFilter,
    ) -> SiteResult<Vec<CatalogVersion>>;
}

/// Modrinth v2 REST API.
pub struct ModrinthClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ModrinthClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ModCatalog for ModrinthClient {
    async fn project_versions(
        &self,
        slug: &str,
        filter: &CompatibilityFilter,
    ) -> SiteResult<Vec<CatalogVersion>> {
        let url = format!("{}/v2/project/{}/version", self.base_url, slug);
        debug!("Querying {} ({} {})", url, filter.loader, filter.game_version);

        let resp = self
            .client
            .get(&url)
            .query(&filter.query())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::UpstreamStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(resp.json::<Vec<CatalogVersion>>().await?)
    }
}
