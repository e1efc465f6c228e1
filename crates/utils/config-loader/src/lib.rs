pub mod app_config;
pub mod loader;
pub mod logging;

pub use config::{ConfigError, FileFormat};
pub use loader::{load_config, load_config_str};
