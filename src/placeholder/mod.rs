//! Placeholder extraction and restoration
pub mod extractor;
pub mod restorer;

pub use extractor::{
    PlaceholderRecord,
    VariableDictionary,
    extract_placeholders,
    find_placeholders,
};
pub use restorer::{
    RestoreStats,
    restore,
};
