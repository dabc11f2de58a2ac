// ─── Stats Proxy ───
// Forwards to the stats endpoint of the game-server plugin, adding the
// shared token. Snapshots are opaque JSON and passed through verbatim.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::cache::TtlCache;
use crate::core::error::{SiteError, SiteResult};

pub type StatsSnapshot = Value;

pub struct StatsProxy {
    client: Client,
    url: String,
    token: String,
    timeout: Duration,
    cache: TtlCache<StatsSnapshot>,
}

impl StatsProxy {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        token: impl Into<String>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            token: token.into(),
            timeout,
            cache: TtlCache::new(ttl),
        }
    }

    /// Current snapshot: fresh cache, else a new fetch, else the last
    /// snapshot ever fetched whatever its age.
    pub async fn get(&self) -> SiteResult<Arc<StatsSnapshot>> {
        if let Some(snapshot) = self.cache.fresh().await {
            return Ok(snapshot);
        }

        let _guard = self.cache.refresh_guard().await;
        if let Some(snapshot) = self.cache.fresh().await {
            return Ok(snapshot);
        }

        match self.fetch().await {
            Ok(snapshot) => Ok(self.cache.store(snapshot).await),
            Err(e) => {
                warn!("Stats endpoint unreachable: {}", e);
                match self.cache.last_known().await {
                    Some(stale) => {
                        debug!("Serving stale stats snapshot");
                        Ok(stale)
                    }
                    None => Err(SiteError::StatsUnavailable),
                }
            }
        }
    }

    async fn fetch(&self) -> SiteResult<StatsSnapshot> {
        let resp = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, &self.token)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::UpstreamStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(resp.json::<StatsSnapshot>().await?)
    }
}
