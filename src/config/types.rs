use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::input::RESERVED_PATH_CHARS;
use crate::translate::PlaceholderFailurePolicy;

/// Default Google Cloud Translation v2 endpoint
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "google.timeoutSecs")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorSettings {
    /// Language of the base resource file.
    pub base_language: String,

    /// Base resource file to translate.
    pub dictionary: PathBuf,

    /// Directory receiving `locale-<lang>*.json` outputs.
    pub output_dir: PathBuf,

    /// Joins nested keys in flattened paths. Cannot contain `[`, `]` or `\\`.
    pub key_separator: String,

    /// Maximum in-flight translation requests.
    ///
    /// - `None`: every request is submitted at once (default)
    /// - `Some(n)`: at most `n` requests run concurrently
    pub concurrency: Option<usize>,

    /// Effect of a failed placeholder translation on its owning key.
    pub placeholder_failure: PlaceholderFailurePolicy,

    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoogleConfig {
    /// Billing project, sent as `X-Goog-User-Project` when set.
    pub project_id: Option<String>,
    /// Falls back to `GOOGLE_TRANSLATE_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Translation v2 REST endpoint.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            endpoint: DEFAULT_GOOGLE_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_language: Option<String>,
    pub dictionary: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
}

impl TranslatorSettings {
    /// # Errors
    /// - Required field is empty
    /// - Zero concurrency or timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.base_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "baseLanguage",
                "The base language cannot be empty. Example: \"en\"",
            ));
        }

        if self.dictionary.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "dictionary",
                "A base resource file is required. Example: \"./locales/locale-en.json\"",
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "outputDir",
                "An output directory is required. Example: \"./translations\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        } else if self.key_separator.contains(RESERVED_PATH_CHARS) {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot contain '[', ']' or '\\', which mark array positions in flattened keys",
            ));
        }

        if self.concurrency == Some(0) {
            errors.push(ValidationError::new(
                "concurrency",
                "Concurrency must be at least 1, or removed for no limit",
            ));
        }

        if self.google.endpoint.trim().is_empty() {
            errors.push(ValidationError::new("google.endpoint", "The endpoint cannot be empty"));
        }

        if self.google.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "google.timeoutSecs",
                "The timeout must be at least 1 second",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Apply command line values on top of these settings.
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(base_language) = overrides.base_language {
            self.base_language = base_language;
        }
        if let Some(dictionary) = overrides.dictionary {
            self.dictionary = dictionary;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if overrides.concurrency.is_some() {
            self.concurrency = overrides.concurrency;
        }
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            base_language: "en".to_string(),
            dictionary: PathBuf::from("./locale-en.json"),
            output_dir: PathBuf::from("./translations"),
            key_separator: ".".to_string(),
            concurrency: None,
            placeholder_failure: PlaceholderFailurePolicy::default(),
            google: GoogleConfig::default(),
        }
    }
}
