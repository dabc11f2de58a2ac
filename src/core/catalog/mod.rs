mod metadata;
mod model;
mod mods;
mod resolver;

pub use metadata::MetadataCache;
pub use model::{Category, LoaderType, ModDescriptor, ModRelease, ModsMap, ResolvedMod};
pub use mods::{validate_catalog, MODS};
pub use resolver::ModResolver;

#[cfg(test)]
pub(crate) use resolver::tests::FakeCatalog;
