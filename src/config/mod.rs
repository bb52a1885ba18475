//! Settings loading and validation
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    API_KEY_ENV,
    ConfigManager,
};
pub use types::{
    ConfigError,
    DEFAULT_GOOGLE_ENDPOINT,
    GoogleConfig,
    SettingsOverrides,
    TranslatorSettings,
    ValidationError,
};
