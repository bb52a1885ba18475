//! Post-translation placeholder restoration

use regex::{
    NoExpand,
    RegexBuilder,
};

use super::VariableDictionary;
use crate::input::FlatMap;

/// Outcome counters of one [`restore`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreStats {
    /// Records whose translated form was found and replaced
    pub restored: usize,
    /// Records whose translated form did not occur in the translated string
    pub missed: usize,
    /// Records without a translation to look for
    pub skipped: usize,
}

/// Put the original placeholder tokens back into translated strings.
///
/// For every key present in both maps, each record's translated text is
/// searched case-insensitively and literally inside the translated string and
/// replaced with the raw token. Replacements accumulate over the records of a
/// key. Keys missing from `translated` (failed outright) are left alone, and a
/// translated form that does not occur verbatim leaves the string unchanged.
pub fn restore(translated: &mut FlatMap, variables: &VariableDictionary) -> RestoreStats {
    let mut stats = RestoreStats::default();

    for (key, records) in variables {
        let Some(text) = translated.get_mut(key) else {
            continue;
        };

        for record in records {
            if record.translated.is_empty() {
                stats.skipped += 1;
                continue;
            }

            let pattern = match RegexBuilder::new(&regex::escape(&record.translated))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => pattern,
                Err(err) => {
                    tracing::warn!(key = %key, ?err, "Failed to build restoration pattern");
                    stats.skipped += 1;
                    continue;
                }
            };

            if pattern.is_match(text.as_str()) {
                let replaced =
                    pattern.replace_all(text.as_str(), NoExpand(&record.variable)).into_owned();
                *text = replaced;
                stats.restored += 1;
            } else {
                tracing::debug!(
                    key = %key,
                    translated = %record.translated,
                    "Translated placeholder not found in translated string"
                );
                stats.missed += 1;
            }
        }
    }

    stats
}
