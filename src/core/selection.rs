// ─── Selection ───
// Headless form of the mods page checkboxes: required mods stay on,
// picking a mod pulls in its dependencies transitively.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::archive::{ArchiveEntry, DownloadRequest};
use crate::core::catalog::ModsMap;
use crate::core::error::SiteResult;

pub struct Selection<'a> {
    mods: &'a ModsMap,
    selected: BTreeSet<String>,
}

impl<'a> Selection<'a> {
    /// Start with every available required mod selected.
    pub fn new(mods: &'a ModsMap) -> Self {
        let mut selection = Self {
            mods,
            selected: BTreeSet::new(),
        };
        let required: Vec<String> = mods
            .values()
            .filter(|m| m.descriptor.required && m.is_available())
            .map(|m| m.id().to_string())
            .collect();
        for id in required {
            selection.select(&id);
        }
        selection
    }

    fn is_selectable(&self, id: &str) -> bool {
        self.mods.get(id).is_some_and(|m| m.is_available())
    }

    /// Select `id` and everything it depends on.
    ///
    /// Unknown or unavailable mods cannot be selected. Returns the ids
    /// that were newly selected.
    pub fn select(&mut self, id: &str) -> Vec<String> {
        let mut added = Vec::new();
        if !self.is_selectable(id) {
            return added;
        }

        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if !self.selected.insert(current.clone()) {
                continue;
            }
            if let Some(resolved) = self.mods.get(&current) {
                pending.extend(
                    resolved
                        .descriptor
                        .deps
                        .iter()
                        .filter(|dep| self.is_selectable(dep) && !self.selected.contains(**dep))
                        .map(|dep| dep.to_string()),
                );
            }
            added.push(current);
        }

        debug!("Selected {} (+{} with dependencies)", id, added.len());
        added
    }

    /// Deselect `id`. Required mods stay selected; dependents are left as
    /// they are. Returns whether the selection changed.
    pub fn deselect(&mut self, id: &str) -> bool {
        let required = self.mods.get(id).is_some_and(|m| m.descriptor.required);
        !required && self.selected.remove(id)
    }

    pub fn select_all(&mut self) {
        let ids: Vec<String> = self.mods.keys().cloned().collect();
        for id in ids {
            self.select(&id);
        }
    }

    /// Clear everything except required mods.
    pub fn deselect_all(&mut self) {
        let mods = self.mods;
        self.selected
            .retain(|id| mods.get(id).is_some_and(|m| m.descriptor.required));
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The archive request for the current selection, in id order.
    pub fn download_request(&self) -> SiteResult<DownloadRequest> {
        let entries = self
            .selected
            .iter()
            .filter_map(|id| self.mods.get(id))
            .filter_map(|m| m.release())
            .map(|release| ArchiveEntry {
                url: release.url.clone(),
                filename: release.filename.clone(),
            })
            .collect();

        DownloadRequest::new(entries)
    }
}
