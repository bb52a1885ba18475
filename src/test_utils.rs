//! Test utilities
//!
//! Stub translator and helpers shared by the unit test modules.
#![cfg(test)]

use std::collections::{
    HashMap,
    HashSet,
};
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::time::Duration;

use async_trait::async_trait;

use crate::input::FlatMap;
use crate::placeholder::find_placeholders;
use crate::translate::{
    TranslateError,
    TranslateOptions,
    Translator,
};

/// Build a `FlatMap` from `(key, value)` pairs
pub(crate) fn flat_map(entries: &[(&str, &str)]) -> FlatMap {
    entries.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

/// Stub translator with deterministic results
///
/// - plain text: returned with `suffix` appended
/// - a lone placeholder: its `placeholders` mapping, or unchanged
/// - text listed in `failures`: an error
#[derive(Debug, Default)]
pub(crate) struct StubTranslator {
    /// Appended to plain text
    suffix: String,
    /// Inputs that fail
    failures: HashSet<String>,
    /// Placeholder translations
    placeholders: HashMap<String, String>,
    /// Per-input delay in milliseconds
    delays: HashMap<String, u64>,
    /// Number of calls
    calls: AtomicUsize,
}

impl StubTranslator {
    pub(crate) fn new(suffix: &str) -> Self {
        Self { suffix: suffix.to_string(), ..Self::default() }
    }

    pub(crate) fn failing_on(mut self, text: &str) -> Self {
        self.failures.insert(text.to_string());
        self
    }

    pub(crate) fn with_placeholder(mut self, token: &str, translated: &str) -> Self {
        self.placeholders.insert(token.to_string(), translated.to_string());
        self
    }

    pub(crate) fn delaying(mut self, text: &str, millis: u64) -> Self {
        self.delays.insert(text.to_string(), millis);
        self
    }

    /// Calls made so far
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        text: &str,
        _options: &TranslateOptions,
    ) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(millis) = self.delays.get(text) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }

        if self.failures.contains(text) {
            return Err(TranslateError::Rejected(format!("stub rejected '{text}'")));
        }

        let is_placeholder = find_placeholders(text).eq(std::iter::once(text));
        if is_placeholder {
            return Ok(self.placeholders.get(text).cloned().unwrap_or_else(|| text.to_string()));
        }

        Ok(format!("{text}{}", self.suffix))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}
