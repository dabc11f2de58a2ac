use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::error::{SiteError, SiteResult};

/// Body of `POST /api/download-mods` as sent by the browser.
#[derive(Debug, Deserialize)]
pub struct DownloadPayload {
    #[serde(default)]
    pub mods: Option<Vec<DownloadItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadItem {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// One file to place in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub url: String,
    pub filename: String,
}

/// Validated, url-unique list of files to bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    mods: Vec<ArchiveEntry>,
}

impl DownloadRequest {
    /// Deduplicate by url and reject an empty list.
    ///
    /// A repeated url keeps the position of its first occurrence and the
    /// filename of its last one. Distinct urls sharing a filename get
    /// numbered names (`mod (2).jar`) so no entry shadows another.
    pub fn new(entries: Vec<ArchiveEntry>) -> SiteResult<Self> {
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        let mut mods: Vec<ArchiveEntry> = Vec::with_capacity(entries.len());

        for entry in entries {
            match positions.get(&entry.url) {
                Some(&i) => mods[i].filename = entry.filename,
                None => {
                    positions.insert(entry.url.clone(), mods.len());
                    mods.push(entry);
                }
            }
        }

        if mods.is_empty() {
            return Err(SiteError::BadRequest("Mod list is empty".into()));
        }

        let mut taken = HashSet::with_capacity(mods.len());
        for entry in &mut mods {
            if !taken.insert(entry.filename.clone()) {
                entry.filename = numbered_name(&entry.filename, &taken);
                taken.insert(entry.filename.clone());
            }
        }

        Ok(Self { mods })
    }

    /// Validate a browser payload. Items without a url are dropped and
    /// filenames are reduced to a bare file name.
    pub fn from_payload(payload: DownloadPayload) -> SiteResult<Self> {
        let items = payload.mods.unwrap_or_default();

        let entries = items
            .into_iter()
            .filter_map(|item| {
                let url = item.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
                let filename =
                    normalize_file_name(item.filename.as_deref().unwrap_or_default(), &url);
                Some(ArchiveEntry { url, filename })
            })
            .collect();

        Self::new(entries)
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.mods
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }
}

/// First `stem (n).ext` not yet in `taken`, counting from 2.
fn numbered_name(name: &str, taken: &HashSet<String>) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(i) if i > 0 => name.split_at(i),
        _ => (name, ""),
    };

    let mut n = 2;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Last path segment of `file_name`, falling back to the last segment of
/// the url path, so entries never escape the archive root.
pub fn normalize_file_name(file_name: &str, url: &str) -> String {
    fn last_segment(path: &str) -> Option<&str> {
        path.rsplit(['/', '\\'])
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
    }

    if let Some(name) = last_segment(file_name) {
        return name.to_string();
    }

    let url_path = url.split(['?', '#']).next().unwrap_or_default();
    last_segment(url_path)
        .filter(|s| !s.contains(':'))
        .unwrap_or("download")
        .to_string()
}
