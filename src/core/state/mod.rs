mod app_state;
mod config;

pub use app_state::AppState;
pub use config::{SiteConfig, GAME_VERSION, LOADER};
