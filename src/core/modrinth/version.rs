// ─── Modrinth Versions ───
// Typed view of `GET /v2/project/{slug}/version` and release selection.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::catalog::ModRelease;

/// A single project version as listed by Modrinth. Only the fields the
/// site needs are kept; anything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogVersion {
    pub version_number: String,
    #[serde(default)]
    pub date_published: Option<DateTime<Utc>>,
    pub files: Vec<CatalogFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
}

impl CatalogVersion {
    /// The primary file if one is flagged, else the first listed file.
    pub fn preferred_file(&self) -> Option<&CatalogFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

/// Pick the release to offer from a filtered version list.
///
/// Versions are ordered by publish date, newest first. Versions without a
/// date go last and ties keep the order the service returned. The first
/// version that has a file wins.
pub fn select_release(mut versions: Vec<CatalogVersion>) -> Option<ModRelease> {
    versions.sort_by(|a, b| b.date_published.cmp(&a.date_published));

    versions.iter().find_map(|version| {
        version.preferred_file().map(|file| ModRelease {
            version: version.version_number.clone(),
            url: file.url.clone(),
            filename: file.filename.clone(),
        })
    })
}
