use config::{Config, ConfigError, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Load a configuration file, picking the format from its extension.
pub fn load_config<T>(path: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut config_path = PathBuf::from(path);

    config_path =
        std::fs::canonicalize(&config_path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    let settings = Config::builder()
        .add_source(File::from(config_path))
        .build()?;

    settings
        .try_deserialize::<T>()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))
}

/// Load configuration from in-memory text of a known format.
pub fn load_config_str<T>(text: &str, format: FileFormat) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(File::from_str(text, format))
        .build()?
        .try_deserialize::<T>()
}
