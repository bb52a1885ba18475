//! Target language code validation

use std::collections::HashSet;
use std::sync::LazyLock;

use thiserror::Error;

/// ISO 639-1 codes plus the few longer codes machine translation services accept.
static LANGUAGE_CODES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "af", "am", "ar", "as", "ay", "az", "be", "bg", "bm", "bn", "bs", "ca", "co", "cs", "cy",
        "da", "de", "dv", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "fi", "fr", "fy", "ga",
        "gd", "gl", "gn", "gu", "ha", "he", "hi", "hr", "ht", "hu", "hy", "id", "ig", "is", "it",
        "iw", "ja", "jv", "jw", "ka", "kk", "km", "kn", "ko", "ku", "ky", "la", "lb", "lg", "ln",
        "lo", "lt", "lv", "mg", "mi", "mk", "ml", "mn", "mr", "ms", "mt", "my", "nb", "ne", "nl",
        "nn", "no", "ny", "om", "or", "pa", "pl", "ps", "pt", "qu", "ro", "ru", "rw", "sa", "sd",
        "si", "sk", "sl", "sm", "sn", "so", "sq", "sr", "st", "su", "sv", "sw", "ta", "te", "tg",
        "th", "ti", "tk", "tl", "tr", "ts", "tt", "ug", "uk", "ur", "uz", "vi", "xh", "yi", "yo",
        "zh", "zu", "ceb", "doi", "fil", "haw", "hmn", "ilo", "kok", "kri", "lus", "mai", "mni",
        "nso", "syr",
    ]
    .into_iter()
    .collect()
});

/// Rejected target language code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("Please enter a translation code")]
    Empty,
    #[error("Invalid characters in language code: '{0}'")]
    InvalidCharacters(String),
}

/// Check that `code` can be used as a target language.
///
/// # Errors
/// Empty codes and codes with characters other than ASCII letters, digits,
/// `-` and `_` are rejected.
pub fn validate_target_language(code: &str) -> Result<(), LanguageError> {
    if code.trim().is_empty() {
        return Err(LanguageError::Empty);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(LanguageError::InvalidCharacters(code.to_string()));
    }

    Ok(())
}

/// Whether the primary subtag of `code` is a known language (`pt-BR` -> `pt`).
#[must_use]
pub fn is_known_language(code: &str) -> bool {
    let primary = code.split(['-', '_']).next().unwrap_or_default().to_lowercase();
    LANGUAGE_CODES.contains(primary.as_str())
}
