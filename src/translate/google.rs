//! Google Cloud Translation (v2 REST) backend

use std::time::Duration;

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

use super::client::{
    TranslateError,
    TranslateOptions,
    Translator,
};
use crate::config::GoogleConfig;

/// Request body of `translate/v2`.
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Texts to translate; always a single entry
    q: [&'a str; 1],
    /// Source language
    source: &'a str,
    /// Target language
    target: &'a str,
    /// `text` keeps the service from HTML-escaping the output
    format: &'static str,
}

/// Successful response body.
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// Payload
    data: TranslateData,
}

/// `data` member of [`TranslateResponse`].
#[derive(Debug, Deserialize)]
struct TranslateData {
    /// One entry per submitted text
    #[serde(default)]
    translations: Vec<TranslationItem>,
}

/// A translated text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationItem {
    /// Output text
    translated_text: String,
}

/// Error response body.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    /// Error details
    error: ErrorBody,
}

/// `error` member of [`ErrorResponse`].
#[derive(Debug, Deserialize)]
struct ErrorBody {
    /// Human readable message
    message: String,
}

/// [`Translator`] backed by the Google Cloud Translation REST API.
#[derive(Clone)]
pub struct GoogleTranslator {
    /// Shared HTTP client (connection pooling)
    client: reqwest::Client,
    /// `translate/v2` endpoint URL
    endpoint: String,
    /// API key sent as `X-Goog-Api-Key`
    api_key: String,
    /// Billing project sent as `X-Goog-User-Project`
    project_id: Option<String>,
}

impl std::fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl GoogleTranslator {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Fails when no API key is configured or the HTTP client cannot be built.
    pub fn new(config: &GoogleConfig) -> Result<Self, TranslateError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(TranslateError::MissingCredentials)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            project_id: config.project_id.clone(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> Result<String, TranslateError> {
        let body =
            TranslateRequest { q: [text], source: &options.from, target: &options.to, format: "text" };

        let mut request =
            self.client.post(&self.endpoint).header("X-Goog-Api-Key", &self.api_key).json(&body);
        if let Some(project_id) = &self.project_id {
            request = request.header("X-Goog-User-Project", project_id);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }

        let parsed: TranslateResponse = response.json().await?;
        first_translation(parsed)
    }

    fn provider_name(&self) -> &str {
        "Google Cloud Translation"
    }
}

/// Only the first translation of a response is used.
fn first_translation(response: TranslateResponse) -> Result<String, TranslateError> {
    response
        .data
        .translations
        .into_iter()
        .next()
        .map(|item| item.translated_text)
        .ok_or(TranslateError::EmptyResponse)
}

/// Pull the message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.trim().to_string(), |parsed| parsed.error.message)
}
