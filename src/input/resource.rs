//! Base resource file loading

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading the base resource. All of them are fatal.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The file could not be read
    #[error("Failed to read resource file '{path}': {source}")]
    Read {
        /// Path that was requested
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// The file is not valid JSON
    #[error("Failed to parse resource file '{path}': {source}")]
    Parse {
        /// Path that was requested
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },
    /// The document root is not a JSON object
    #[error("Resource file '{0}' must contain a JSON object at the top level")]
    NotAnObject(String),
}

/// Load the base-language resource tree.
///
/// # Errors
/// Returns error if the file cannot be read, is not JSON, or is not an object.
pub fn load_resource_file(file_path: &Path) -> Result<Value, ResourceError> {
    let path = file_path.display().to_string();
    tracing::debug!(path = %path, "Loading base resource file");

    let content = std::fs::read_to_string(file_path)
        .map_err(|source| ResourceError::Read { path: path.clone(), source })?;

    parse_resource(&content).map_err(|err| match err {
        ParseFailure::Json(source) => ResourceError::Parse { path, source },
        ParseFailure::NotAnObject => ResourceError::NotAnObject(path),
    })
}

/// Reason [`parse_resource`] rejected a document.
#[derive(Debug)]
enum ParseFailure {
    /// Not JSON
    Json(serde_json::Error),
    /// JSON, but not an object
    NotAnObject,
}

/// Parse resource text into a tree.
fn parse_resource(content: &str) -> Result<Value, ParseFailure> {
    let json: Value = serde_json::from_str(content).map_err(ParseFailure::Json)?;
    if json.is_object() { Ok(json) } else { Err(ParseFailure::NotAnObject) }
}
