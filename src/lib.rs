//! locale-translator
//!
//! Machine translation of nested JSON locale dictionaries. The base resource
//! is flattened to dotted keys, every string and every `{{placeholder}}` is
//! sent to a translation service concurrently, placeholders are restored in
//! the translated text, and the nested tree is written back together with
//! the failed translations and the placeholder audit file.

pub mod cli;
pub mod config;
pub mod input;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod placeholder;
pub mod session_log;
pub mod translate;

#[cfg(test)]
mod test_utils;

pub use pipeline::{
    DictionaryTranslator,
    PipelineError,
    SessionReport,
};
