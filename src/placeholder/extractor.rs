//! Template placeholder extraction

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};

use crate::input::FlatMap;

/// `{{identifier}}`: double braces around word characters. No escaping.
#[allow(clippy::expect_used)]
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[A-Za-z0-9_]*\}\}").expect("placeholder regex"));

/// One placeholder occurrence inside a flattened string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRecord {
    /// Raw token as written in the source text (e.g. `{{name}}`)
    pub variable: String,
    /// Translation service output for the token; empty until it resolves
    pub translated: String,
}

impl PlaceholderRecord {
    /// Record for `variable`, not yet translated.
    #[must_use]
    pub fn new(variable: impl Into<String>) -> Self {
        Self { variable: variable.into(), translated: String::new() }
    }
}

/// Flat key -> placeholder occurrences in source order.
///
/// Keys whose text has no placeholder are absent.
pub type VariableDictionary = BTreeMap<String, Vec<PlaceholderRecord>>;

/// Iterate the placeholder tokens of `text` in order, duplicates included.
pub fn find_placeholders(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER_RE.find_iter(text).map(|m| m.as_str())
}

/// Build the variable dictionary for every entry of `flat`.
#[must_use]
pub fn extract_placeholders(flat: &FlatMap) -> VariableDictionary {
    flat.iter()
        .filter_map(|(key, value)| {
            let records: Vec<_> = find_placeholders(value).map(PlaceholderRecord::new).collect();
            (!records.is_empty()).then(|| (key.clone(), records))
        })
        .collect()
}
