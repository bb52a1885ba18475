//! Output file writing

use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use thiserror::Error;

/// Failure to write one output file. Never aborts the session.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),
}

/// Paths of the files produced for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `locale-<lang>.json`
    pub translated: PathBuf,
    /// `locale-<lang>-failed.json`
    pub failed: PathBuf,
    /// `locale-<lang>-var.json`
    pub variables: PathBuf,
    /// `locale-<lang>-debug.txt`
    pub debug: PathBuf,
}

impl OutputPaths {
    #[must_use]
    pub fn new(output_dir: &Path, language: &str) -> Self {
        Self {
            translated: output_dir.join(format!("locale-{language}.json")),
            failed: output_dir.join(format!("locale-{language}-failed.json")),
            variables: output_dir.join(format!("locale-{language}-var.json")),
            debug: output_dir.join(format!("locale-{language}-debug.txt")),
        }
    }
}

/// Files written and files that failed during one session.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Files written successfully
    pub written: Vec<PathBuf>,
    /// Files that could not be written, with the cause
    pub failed: Vec<(PathBuf, WriteError)>,
}

impl WriteReport {
    /// Track the outcome of writing `path`.
    pub fn record(&mut self, path: &Path, result: Result<(), WriteError>) {
        match result {
            Ok(()) => self.written.push(path.to_path_buf()),
            Err(err) => self.failed.push((path.to_path_buf(), err)),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create the output directory if it does not exist yet.
///
/// # Errors
/// Returns the I/O error of the directory creation.
pub async fn ensure_output_dir(output_dir: &Path) -> Result<(), WriteError> {
    tokio::fs::create_dir_all(output_dir).await?;
    Ok(())
}

/// Write `value` as JSON indented by two spaces.
///
/// # Errors
/// Serialization or I/O failure.
pub async fn write_json_file<T>(path: &Path, value: &T) -> Result<(), WriteError>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

/// Write plain text.
///
/// # Errors
/// I/O failure.
pub async fn write_text_file(path: &Path, text: &str) -> Result<(), WriteError> {
    tokio::fs::write(path, text).await?;
    Ok(())
}
