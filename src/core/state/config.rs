use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::catalog::LoaderType;
use crate::core::error::{SiteError, SiteResult};

pub const GAME_VERSION: &str = "1.21.11";
pub const LOADER: LoaderType = LoaderType::Fabric;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_STATS_URL: &str = "http://localhost:8081/stats";
const DEFAULT_SECRET_TOKEN: &str = "mineshishauthtokenpaws";
const DEFAULT_MODRINTH_API: &str = "https://api.modrinth.com";
const DEFAULT_PUBLIC_DIR: &str = "frontend/public";
const DEFAULT_MAP_DIR: &str = "Pl3xMap";

/// Runtime settings of the site, read once at startup.
///
/// Only deployment-specific values come from the environment; the
/// compatibility target, TTLs and timeouts are fixed here.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
    pub map_dir: PathBuf,

    // ── Mod catalog ──
    pub modrinth_api_url: String,
    pub game_version: String,
    pub loader: LoaderType,
    pub mods_ttl: Duration,
    pub catalog_timeout: Duration,
    /// Maximum catalog queries in flight while resolving.
    pub resolve_concurrency: usize,

    // ── Archive ──
    pub download_timeout: Duration,
    /// Scratch directory for downloads; the system temp dir when unset.
    pub spool_dir: Option<PathBuf>,

    // ── Stats proxy ──
    pub stats_url: String,
    pub stats_token: String,
    pub stats_ttl: Duration,
    pub stats_timeout: Duration,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            map_dir: PathBuf::from(DEFAULT_MAP_DIR),
            modrinth_api_url: DEFAULT_MODRINTH_API.into(),
            game_version: GAME_VERSION.into(),
            loader: LOADER,
            mods_ttl: Duration::from_secs(60 * 60),
            catalog_timeout: Duration::from_secs(15),
            resolve_concurrency: 8,
            download_timeout: Duration::from_secs(120),
            spool_dir: None,
            stats_url: DEFAULT_STATS_URL.into(),
            stats_token: DEFAULT_SECRET_TOKEN.into(),
            stats_ttl: Duration::from_secs(10),
            stats_timeout: Duration::from_secs(5),
        }
    }
}

impl SiteConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> SiteResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset or
    /// blank variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> SiteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("PORT") {
            config.port = raw.trim().parse().map_err(|_| SiteError::Config {
                key: "PORT",
                value: raw.clone(),
            })?;
        }
        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        config.bind_addr = bind.trim().parse().map_err(|_| SiteError::Config {
            key: "BIND_ADDR",
            value: bind.clone(),
        })?;

        if let Some(url) = get("MINECRAFT_PLUGIN_URL") {
            config.stats_url = url;
        }
        if let Some(token) = get("SECRET_TOKEN") {
            config.stats_token = token;
        }
        if let Some(url) = get("MODRINTH_API_URL") {
            config.modrinth_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = get("PUBLIC_DIR") {
            config.public_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("MAP_DIR") {
            config.map_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("SPOOL_DIR") {
            config.spool_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = SiteConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.stats_url, "http://localhost:8081/stats");
        assert_eq!(config.stats_token, "mineshishauthtokenpaws");
        assert_eq!(config.game_version, "1.21.11");
        assert_eq!(config.loader, LoaderType::Fabric);
        assert_eq!(config.mods_ttl, Duration::from_secs(3600));
        assert_eq!(config.stats_ttl, Duration::from_secs(10));
        assert_eq!(config.spool_dir, None);
    }

    #[test]
    fn environment_overrides_deployment_values() {
        let config = SiteConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("MINECRAFT_PLUGIN_URL", "http://10.0.0.5:8081/stats"),
            ("SECRET_TOKEN", "paws"),
            ("MODRINTH_API_URL", "http://127.0.0.1:9000/"),
            ("PUBLIC_DIR", "/srv/site"),
            ("SPOOL_DIR", "/var/tmp/mineshish"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.stats_url, "http://10.0.0.5:8081/stats");
        assert_eq!(config.stats_token, "paws");
        assert_eq!(config.modrinth_api_url, "http://127.0.0.1:9000");
        assert_eq!(config.public_dir, PathBuf::from("/srv/site"));
        assert_eq!(config.map_dir, PathBuf::from("Pl3xMap"));
        assert_eq!(config.spool_dir, Some(PathBuf::from("/var/tmp/mineshish")));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = SiteConfig::from_lookup(lookup_from(&[("PORT", "  "), ("SECRET_TOKEN", "")]))
            .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.stats_token, "mineshishauthtokenpaws");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = SiteConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, SiteError::Config { key: "PORT", .. }));
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let err = SiteConfig::from_lookup(lookup_from(&[("BIND_ADDR", "localhost:80")]))
            .unwrap_err();
        assert!(matches!(err, SiteError::Config { key: "BIND_ADDR", .. }));
    }
}
