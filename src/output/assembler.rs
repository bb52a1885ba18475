//! Reassembly of the translated tree and session counters

use serde::Serialize;
use serde_json::Value;

use crate::input::{
    FlatMap,
    unflatten,
};

/// Entry counts reported at the end of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Leaves in the base resource
    pub source_entries: usize,
    /// Keys in the written translation
    pub translated_entries: usize,
    /// Keys in the failed-translations file
    pub failed_entries: usize,
}

/// Nested result tree plus its summary.
#[derive(Debug, Clone)]
pub struct Assembled {
    /// Nested translated resource
    pub tree: Value,
    /// Entry counts
    pub summary: SessionSummary,
}

/// Rebuild the nested translated tree.
///
/// `translated` iterates in lexicographic key order, so the produced objects
/// list their members in that order regardless of completion order.
#[must_use]
pub fn assemble(
    translated: &FlatMap,
    failed: &FlatMap,
    source_entries: usize,
    separator: &str,
) -> Assembled {
    Assembled {
        tree: unflatten(translated, separator),
        summary: SessionSummary {
            source_entries,
            translated_entries: translated.len(),
            failed_entries: failed.len(),
        },
    }
}
