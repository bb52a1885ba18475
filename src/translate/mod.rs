//! Translation service client and request dispatch
pub mod client;
pub mod dispatcher;
pub mod google;

pub use client::{
    TranslateError,
    TranslateOptions,
    Translator,
};
pub use dispatcher::{
    DispatchOptions,
    Dispatched,
    PlaceholderFailurePolicy,
    dispatch_all,
};
pub use google::GoogleTranslator;
