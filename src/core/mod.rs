// ─── Mineshish Site Core ───
// Backend services behind the community server website.
//
// Architecture:
//   core/
//     catalog/    Mod descriptors, resolver, metadata cache
//     modrinth/   Modrinth version API + release selection
//     archive/    Download requests + streaming zip builder
//     stats/      Proxy to the game-server stats plugin
//     selection/  Dependency-aware mod selection
//     cache/      TTL cache shared by metadata and stats
//     state/      Site configuration + shared handler state

pub mod archive;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod http;
pub mod modrinth;
pub mod selection;
pub mod state;
pub mod stats;
