//! Settings file loading

use std::path::Path;

use super::{
    ConfigError,
    TranslatorSettings,
};

/// Settings file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".locale-translator.json";

/// Load settings from a directory
///
/// Looks for `.locale-translator.json` and reads it
///
/// # Returns
/// - `Ok(Some(settings))`: file found and parsed
/// - `Ok(None)`: no settings file
/// - `Err(ConfigError)`: read or parse error
pub(super) fn load_from_dir(dir: &Path) -> Result<Option<TranslatorSettings>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_file(&config_path).map(Some)
}

/// Load settings from the given file
///
/// # Errors
/// - the file does not exist
/// - the file cannot be read
/// - the JSON is malformed
pub(super) fn load_from_file(config_path: &Path) -> Result<TranslatorSettings, ConfigError> {
    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path.to_path_buf()));
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    let settings: TranslatorSettings = serde_json::from_str(&content)?;

    Ok(settings)
}
