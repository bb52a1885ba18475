//! Settings management

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    SettingsOverrides,
    TranslatorSettings,
    loader,
};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

/// Owns the effective settings
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    current_settings: TranslatorSettings,

    /// Path of the loaded settings file
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a manager with default settings
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranslatorSettings::default(), config_path: None }
    }

    /// Load settings
    ///
    /// # Arguments
    /// * `explicit_path` - file given with `--config` (must exist)
    /// * `working_dir` - where `.locale-translator.json` is looked up otherwise
    ///
    /// # Errors
    /// - the explicit file does not exist
    /// - the file cannot be read
    /// - the JSON is malformed
    /// - validation fails
    pub fn load_settings(
        &mut self,
        explicit_path: Option<&Path>,
        working_dir: &Path,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings: explicit={:?}, dir={:?}", explicit_path, working_dir);

        let (settings, config_path) = if let Some(path) = explicit_path {
            (loader::load_from_file(path)?, Some(path.to_path_buf()))
        } else {
            match loader::load_from_dir(working_dir)? {
                Some(settings) => {
                    (settings, Some(working_dir.join(loader::CONFIG_FILE_NAME)))
                }
                None => (TranslatorSettings::default(), None),
            }
        };

        // Validate
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.config_path = config_path;
        tracing::debug!("Settings loaded successfully: {:?}", self.config_path);

        Ok(())
    }

    /// Apply command-line and environment overrides
    ///
    /// `api_key_from_env` is used only while `google.apiKey` is unset.
    ///
    /// # Errors
    /// The overridden settings fail validation
    pub fn apply_overrides(
        &mut self,
        overrides: SettingsOverrides,
        api_key_from_env: Option<String>,
    ) -> Result<(), ConfigError> {
        let mut settings = self.current_settings.clone();
        settings.apply_overrides(overrides);
        if settings.google.api_key.is_none() {
            settings.google.api_key = api_key_from_env.filter(|key| !key.is_empty());
        }

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        Ok(())
    }

    /// Current settings
    #[must_use]
    pub const fn get_settings(&self) -> &TranslatorSettings {
        &self.current_settings
    }

    /// Path of the loaded settings file, if any
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
