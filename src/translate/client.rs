//! Translation service abstraction

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Source and target language of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateOptions {
    /// Language of the submitted text
    pub from: String,
    /// Language to translate into
    pub to: String,
}

impl TranslateOptions {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

/// Failure of a single translation request.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Translation API returned no translations")]
    EmptyResponse,

    #[error("No API key configured. Set google.apiKey or the GOOGLE_TRANSLATE_API_KEY environment variable")]
    MissingCredentials,

    #[error("{0}")]
    Rejected(String),
}

/// A machine translation backend.
///
/// Each call either resolves with the translated text or fails; the caller
/// never retries. Timeouts, if any, belong to the implementation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` according to `options`.
    async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> Result<String, TranslateError>;

    /// Name used in log output.
    fn provider_name(&self) -> &str;
}
