//! Entry point for the locale translation command.

use std::process::ExitCode;

use clap::Parser;
use locale_translator::cli::Args;
use locale_translator::config::{
    API_KEY_ENV,
    ConfigError,
    ConfigManager,
};
use locale_translator::translate::GoogleTranslator;
use locale_translator::{
    DictionaryTranslator,
    PipelineError,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the console logger, plus a file logger when requested.
fn init_tracing(args: &Args) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let console = tracing_subscriber::fmt::layer().with_target(false);

    let Some(path) = &args.log_file else {
        tracing_subscriber::registry().with(env_filter).with(console).init();
        return None;
    };

    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            tracing::debug!(path = %path.display(), "File logging initialized");
            Some(guard)
        }
        Err(e) => {
            // Continue with console output only
            tracing_subscriber::registry().with(env_filter).with(console).init();
            tracing::warn!(error = %e, path = %path.display(), "Failed to open log file; using console only");
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = init_tracing(&args);

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Translate into every requested language.
///
/// Returns `Ok(false)` when at least one session could not run.
async fn run(args: &Args) -> Result<bool, PipelineError> {
    let working_dir = std::env::current_dir().map_err(ConfigError::from)?;
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(args.config.as_deref(), &working_dir)?;
    config_manager.apply_overrides(args.overrides(), std::env::var(API_KEY_ENV).ok())?;
    if let Some(path) = config_manager.config_path() {
        tracing::info!(path = %path.display(), "Using configuration file");
    }

    let settings = config_manager.get_settings().clone();
    let translator = match GoogleTranslator::new(&settings.google) {
        Ok(translator) => translator,
        Err(err) => {
            tracing::error!("{err}");
            return Ok(false);
        }
    };
    let pipeline = DictionaryTranslator::new(settings, translator)?;

    let mut all_ran = true;
    for target in &args.targets {
        match pipeline.translate_dictionary(target).await {
            Ok(report) => {
                tracing::info!(
                    language = %report.language,
                    source = report.summary.source_entries,
                    translated = report.summary.translated_entries,
                    failed = report.summary.failed_entries,
                    "Translation session complete"
                );
                for (path, err) in &report.writes.failed {
                    tracing::warn!(path = %path.display(), "Output not written: {err}");
                }
            }
            Err(err) => {
                tracing::error!(language = %target, "{err}");
                all_ran = false;
            }
        }
    }

    Ok(all_ran)
}
