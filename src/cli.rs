//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::SettingsOverrides;

/// Translate a nested JSON locale dictionary into one or more languages
#[derive(Parser, Debug)]
#[command(name = "locale-translator")]
#[command(version)]
#[command(about = "Translate a nested JSON locale dictionary into one or more languages", long_about = None)]
pub struct Args {
    /// Target language codes (e.g. fr de pt-BR); one session per code
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Settings file (default: ./.locale-translator.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language of the base resource file
    #[arg(long)]
    pub from: Option<String>,

    /// Base resource file to translate
    #[arg(short, long)]
    pub dictionary: Option<PathBuf>,

    /// Directory receiving the output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of concurrent translation requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Settings given on the command line.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_language: self.from.clone(),
            dictionary: self.dictionary.clone(),
            output_dir: self.output_dir.clone(),
            concurrency: self.concurrency,
        }
    }
}
