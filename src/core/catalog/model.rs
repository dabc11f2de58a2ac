use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Supported mod loaders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    Fabric,
    Quilt,
    Forge,
    NeoForge,
}

impl std::fmt::Display for LoaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderType::Fabric => write!(f, "fabric"),
            LoaderType::Quilt => write!(f, "quilt"),
            LoaderType::Forge => write!(f, "forge"),
            LoaderType::NeoForge => write!(f, "neoforge"),
        }
    }
}

/// Section of the mods page a mod is listed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Optimization,
    Visuals,
    Utility,
    Core,
}

/// Hand-authored catalog entry for one optional mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    /// Project slug on Modrinth.
    pub slug: &'static str,
    pub category: Category,
    pub required: bool,
    /// Ids of mods this one needs, in display order.
    pub deps: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl ModDescriptor {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        slug: &'static str,
        category: Category,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            category,
            required: false,
            deps: &[],
            description: None,
        }
    }

    pub const fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn with_deps(mut self, deps: &'static [&'static str]) -> Self {
        self.deps = deps;
        self
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Downloadable file picked for a mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModRelease {
    pub version: String,
    pub url: String,
    pub filename: String,
}

/// A descriptor merged with its resolution outcome.
///
/// Serialized flat: the descriptor fields, `available`, and the release
/// fields only when the mod is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMod {
    #[serde(flatten)]
    pub descriptor: ModDescriptor,
    available: bool,
    #[serde(flatten)]
    release: Option<ModRelease>,
}

impl ResolvedMod {
    pub fn available(descriptor: ModDescriptor, release: ModRelease) -> Self {
        Self {
            descriptor,
            available: true,
            release: Some(release),
        }
    }

    pub fn unavailable(descriptor: ModDescriptor) -> Self {
        Self {
            descriptor,
            available: false,
            release: None,
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor.id
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn release(&self) -> Option<&ModRelease> {
        self.release.as_ref()
    }
}

/// Resolved catalog keyed by mod id.
pub type ModsMap = BTreeMap<String, ResolvedMod>;
