mod client;
mod version;

pub use client::{CompatibilityFilter, ModCatalog, ModrinthClient};
pub use version::{select_release, CatalogFile, CatalogVersion};
