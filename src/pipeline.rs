//! One translation session per target language

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::config::{
    ConfigError,
    TranslatorSettings,
};
use crate::input::{
    ResourceError,
    flatten,
    leaf_count,
    load_resource_file,
};
use crate::language::{
    LanguageError,
    is_known_language,
    validate_target_language,
};
use crate::output::{
    OutputPaths,
    SessionSummary,
    WriteReport,
    assemble,
    ensure_output_dir,
    write_json_file,
    write_text_file,
};
use crate::placeholder::{
    RestoreStats,
    extract_placeholders,
    restore,
};
use crate::session_log::SessionLog;
use crate::translate::{
    DispatchOptions,
    TranslateOptions,
    Translator,
    dispatch_all,
};

/// Errors that abort a session before any translation request is made.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid target language: {0}")]
    Language(#[from] LanguageError),
}

/// Everything a finished session produced besides the files.
#[derive(Debug)]
pub struct SessionReport {
    /// Target language code
    pub language: String,
    /// Entry counts
    pub summary: SessionSummary,
    /// Placeholder restoration counts
    pub restore: RestoreStats,
    /// Files this session writes
    pub paths: OutputPaths,
    /// Outcome of every write
    pub writes: WriteReport,
    /// Messages captured during the session
    pub log: SessionLog,
}

/// Translates the base resource into target languages.
pub struct DictionaryTranslator<T> {
    /// Validated settings
    settings: TranslatorSettings,
    /// Base-language resource tree, read once
    resource: Value,
    /// Translation service
    translator: T,
    /// Messages logged while loading, replayed at the start of every session
    load_log: SessionLog,
}

impl<T> std::fmt::Debug for DictionaryTranslator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryTranslator")
            .field("settings", &self.settings)
            .field("resource", &"<Value>")
            .field("translator", &"<Translator>")
            .field("load_log", &self.load_log)
            .finish()
    }
}

impl<T: Translator> DictionaryTranslator<T> {
    /// Load the base resource named by `settings`.
    ///
    /// # Errors
    /// Invalid settings, or a missing or malformed resource file.
    pub fn new(settings: TranslatorSettings, translator: T) -> Result<Self, PipelineError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let mut load_log = SessionLog::new();
        load_log.info(format!("Loading base resource file {}", settings.dictionary.display()));
        let resource = load_resource_file(&settings.dictionary)?;
        load_log.info(format!("Base resource dictionary loaded: {} entries", leaf_count(&resource)));

        Ok(Self { settings, resource, translator, load_log })
    }

    /// Use an already loaded resource tree.
    #[must_use]
    pub fn with_resource(settings: TranslatorSettings, resource: Value, translator: T) -> Self {
        Self { settings, resource, translator, load_log: SessionLog::new() }
    }

    #[must_use]
    pub const fn settings(&self) -> &TranslatorSettings {
        &self.settings
    }

    #[must_use]
    pub const fn translator(&self) -> &T {
        &self.translator
    }

    /// Run the full pipeline for `target_language` and write its output files.
    ///
    /// Individual translation or write failures do not fail the session; they
    /// show up in the report and in the failed-translations file.
    ///
    /// # Errors
    /// Only an invalid target language code.
    pub async fn translate_dictionary(
        &self,
        target_language: &str,
    ) -> Result<SessionReport, PipelineError> {
        validate_target_language(target_language)?;

        let mut log = self.load_log.clone();
        if !is_known_language(target_language) {
            log.warn(format!("Unrecognized language code '{target_language}', submitting anyway"));
        }
        if target_language.eq_ignore_ascii_case(&self.settings.base_language) {
            log.warn(format!("Target language '{target_language}' is the base language"));
        }

        let separator = &self.settings.key_separator;
        let flat = flatten(&self.resource, separator);
        let mut variables = extract_placeholders(&flat);
        log.info(format!(
            "Translating {} entries with {} placeholders from {} to {} via {}",
            flat.len(),
            variables.values().map(Vec::len).sum::<usize>(),
            self.settings.base_language,
            target_language,
            self.translator.provider_name(),
        ));

        let options = DispatchOptions {
            translate: TranslateOptions::new(&self.settings.base_language, target_language),
            concurrency: self.settings.concurrency,
            placeholder_failure: self.settings.placeholder_failure,
        };
        let mut dispatched =
            dispatch_all(&self.translator, &flat, &mut variables, &options, &mut log).await;

        log.info("Attempting to clean up variables");
        let restore_stats = restore(&mut dispatched.translated, &variables);
        log.info(format!(
            "Placeholders restored: {}, not found: {}, untranslated: {}",
            restore_stats.restored, restore_stats.missed, restore_stats.skipped
        ));

        let assembled = assemble(&dispatched.translated, &dispatched.failed, flat.len(), separator);
        let summary = assembled.summary;

        let paths = OutputPaths::new(&self.settings.output_dir, target_language);
        let mut writes = WriteReport::default();
        if let Err(err) = ensure_output_dir(&self.settings.output_dir).await {
            log.error(format!(
                "Error creating output directory {}: {err}",
                self.settings.output_dir.display()
            ));
        }

        let result = write_json_file(&paths.failed, &dispatched.failed).await;
        log_write(&mut log, &paths.failed, "Failed translations logged", result.as_ref().err());
        writes.record(&paths.failed, result);

        log.info(format!(
            "Original resource size: {}. Translated resource size: {}",
            summary.source_entries, summary.translated_entries
        ));
        log.info(format!(
            "{} translations failed. Please review the {} file for failed translations",
            summary.failed_entries,
            file_name(&paths.failed)
        ));

        log.info("Writing translated resource file");
        let result = write_json_file(&paths.translated, &assembled.tree).await;
        let saved = format!("Translated resource file saved to {}", paths.translated.display());
        log_write(&mut log, &paths.translated, &saved, result.as_ref().err());
        writes.record(&paths.translated, result);

        let result = write_json_file(&paths.variables, &variables).await;
        log_write(
            &mut log,
            &paths.variables,
            "Translated resource variables file saved",
            result.as_ref().err(),
        );
        writes.record(&paths.variables, result);
        log.info(format!(
            "Please verify variable translations utilizing the {} file",
            file_name(&paths.variables)
        ));

        let result = write_text_file(&paths.debug, &log.transcript()).await;
        if let Err(err) = &result {
            tracing::error!(path = %paths.debug.display(), "Error writing debug transcript: {err}");
        }
        writes.record(&paths.debug, result);

        Ok(SessionReport {
            language: target_language.to_string(),
            summary,
            restore: restore_stats,
            paths,
            writes,
            log,
        })
    }
}

/// Log the outcome of one output write.
fn log_write(
    log: &mut SessionLog,
    path: &Path,
    success: &str,
    error: Option<&crate::output::WriteError>,
) {
    match error {
        None => log.info(success),
        Some(err) => log.error(format!("Error writing {}: {err}", path.display())),
    }
}

/// File name for user-facing messages.
fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
