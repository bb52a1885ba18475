//! Concurrent submission of every string and placeholder to the translator

use std::collections::BTreeSet;

use futures::stream::{
    self,
    StreamExt,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::client::{
    TranslateError,
    TranslateOptions,
    Translator,
};
use crate::input::FlatMap;
use crate::placeholder::VariableDictionary;
use crate::session_log::SessionLog;

/// What a failed placeholder translation does to its owning key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderFailurePolicy {
    /// The whole key is reported failed with its original text
    #[default]
    MarkKeyFailed,
    /// Only the placeholder record stays untranslated
    PlaceholderOnly,
}

/// Options of one dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Source and target language of every request
    pub translate: TranslateOptions,
    /// Maximum number of in-flight requests; `None` submits everything at once
    pub concurrency: Option<usize>,
    /// Effect of a failed placeholder on its key
    pub placeholder_failure: PlaceholderFailurePolicy,
}

/// Result maps of a settled dispatch.
#[derive(Debug, Clone, Default)]
pub struct Dispatched {
    /// Key -> translated string
    pub translated: FlatMap,
    /// Key -> original string, for every key that failed
    pub failed: FlatMap,
    /// Number of placeholder requests that failed
    pub placeholder_failures: usize,
}

/// One translation request.
#[derive(Debug)]
enum Job {
    /// Full string of a flat map entry
    Entry {
        /// Flat map key
        key: String,
        /// Source text
        text: String,
    },
    /// `index`-th placeholder occurrence of `key`
    Placeholder {
        /// Owning flat map key
        key: String,
        /// Occurrence within the key's records
        index: usize,
        /// Placeholder token, braces included
        token: String,
    },
}

impl Job {
    /// Text submitted to the translator.
    fn text(&self) -> &str {
        match self {
            Self::Entry { text, .. } => text,
            Self::Placeholder { token, .. } => token,
        }
    }
}

/// Translate every entry of `flat` and every placeholder of `variables`.
///
/// Requests run concurrently and complete in any order. Their results are
/// applied here, one at a time, as they settle; a failure only affects its own
/// key. Returns once every request has settled.
pub async fn dispatch_all<T>(
    translator: &T,
    flat: &FlatMap,
    variables: &mut VariableDictionary,
    options: &DispatchOptions,
    log: &mut SessionLog,
) -> Dispatched
where
    T: Translator + ?Sized,
{
    let jobs = build_jobs(flat, variables, log);
    let limit = options.concurrency.unwrap_or(jobs.len()).max(1);
    tracing::debug!(
        requests = jobs.len(),
        limit,
        provider = translator.provider_name(),
        "Dispatching translation requests"
    );

    let translate_options = &options.translate;
    let mut settled = stream::iter(jobs)
        .map(move |job| async move {
            let result = translator.translate(job.text(), translate_options).await;
            (job, result)
        })
        .buffer_unordered(limit);

    let mut dispatched = Dispatched::default();
    let mut placeholder_failed_keys = BTreeSet::new();

    while let Some((job, result)) = settled.next().await {
        match job {
            Job::Entry { key, text } => {
                apply_entry(&mut dispatched, key, text, result, log);
            }
            Job::Placeholder { key, index, token } => match result {
                Ok(translated) => {
                    log.info(format!("Translated variable {token} {translated}"));
                    if let Some(record) = variables.get_mut(&key).and_then(|r| r.get_mut(index)) {
                        record.translated = translated;
                    }
                }
                Err(err) => {
                    log.error(format!("Error translating variable: {token} :: {err}"));
                    dispatched.placeholder_failures += 1;
                    placeholder_failed_keys.insert(key);
                }
            },
        }
    }

    log.info("All translation requests settled");

    if options.placeholder_failure == PlaceholderFailurePolicy::MarkKeyFailed {
        for key in placeholder_failed_keys {
            dispatched.translated.remove(&key);
            if let Some(original) = flat.get(&key) {
                dispatched.failed.insert(key, original.clone());
            }
        }
    }

    dispatched
}

/// One job per flat entry, then one per placeholder occurrence.
fn build_jobs(flat: &FlatMap, variables: &VariableDictionary, log: &mut SessionLog) -> Vec<Job> {
    let placeholder_count: usize = variables.values().map(Vec::len).sum();
    let mut jobs = Vec::with_capacity(flat.len() + placeholder_count);

    for (key, text) in flat {
        log.info(format!("Submitting string for translation {key} {text}"));
        jobs.push(Job::Entry { key: key.clone(), text: text.clone() });
    }

    for (key, records) in variables {
        for (index, record) in records.iter().enumerate() {
            log.info(format!("Translating variable {}", record.variable));
            jobs.push(Job::Placeholder { key: key.clone(), index, token: record.variable.clone() });
        }
    }

    jobs
}

/// Record the outcome of a full-string request.
fn apply_entry(
    dispatched: &mut Dispatched,
    key: String,
    text: String,
    result: Result<String, TranslateError>,
    log: &mut SessionLog,
) {
    match result {
        Ok(translated) => {
            log.info(format!("Translation completed for {key} {translated}"));
            dispatched.failed.remove(&key);
            dispatched.translated.insert(key, translated);
        }
        Err(err) => {
            log.error(format!("Error translating {key} :: {err}"));
            dispatched.translated.remove(&key);
            dispatched.failed.insert(key, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::placeholder::extract_placeholders;
    use crate::test_utils::{
        StubTranslator,
        flat_map,
    };

    fn options(placeholder_failure: PlaceholderFailurePolicy) -> DispatchOptions {
        DispatchOptions {
            translate: TranslateOptions::new("en", "fr"),
            concurrency: None,
            placeholder_failure,
        }
    }

    #[googletest::test]
    fn test_dispatch_all_isolates_single_failure() {
        let flat = flat_map(&[("a", "one"), ("b", "two"), ("c", "three"), ("d", "four")]);
        let translator = StubTranslator::new("-FR").failing_on("three");
        let mut variables = VariableDictionary::new();
        let mut log = SessionLog::new();

        let dispatched = tokio_test::block_on(dispatch_all(
            &translator,
            &flat,
            &mut variables,
            &options(PlaceholderFailurePolicy::MarkKeyFailed),
            &mut log,
        ));

        expect_that!(dispatched.translated.len(), eq(3));
        expect_that!(dispatched.failed.len(), eq(1));
        expect_that!(dispatched.failed.get("c"), some(eq(&"three".to_string())));
        expect_that!(dispatched.translated.get("a"), some(eq(&"one-FR".to_string())));
        expect_that!(dispatched.translated.contains_key("c"), eq(false));
    }

    #[googletest::test]
    fn test_dispatch_all_fills_placeholder_records() {
        let flat = flat_map(&[("a", "Hello {{name}}, you have {{count}} items")]);
        let translator = StubTranslator::new("-FR").with_placeholder("{{count}}", "{{compte}}");
        let mut variables = extract_placeholders(&flat);
        let mut log = SessionLog::new();

        let dispatched = tokio_test::block_on(dispatch_all(
            &translator,
            &flat,
            &mut variables,
            &options(PlaceholderFailurePolicy::MarkKeyFailed),
            &mut log,
        ));

        let translated: Vec<&str> = variables
            .get("a")
            .map(|records| records.iter().map(|r| r.translated.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(translated, vec!["{{name}}", "{{compte}}"]);
        expect_that!(dispatched.failed.is_empty(), eq(true));
        expect_that!(translator.calls(), eq(3));
    }

    #[googletest::test]
    fn test_dispatch_all_duplicate_tokens_fill_each_record() {
        let flat = flat_map(&[("dup", "{{x}} or {{x}}")]);
        let translator = StubTranslator::new("-FR").with_placeholder("{{x}}", "{{y}}");
        let mut variables = extract_placeholders(&flat);
        let mut log = SessionLog::new();

        tokio_test::block_on(dispatch_all(
            &translator,
            &flat,
            &mut variables,
            &options(PlaceholderFailurePolicy::MarkKeyFailed),
            &mut log,
        ));

        let all_filled =
            variables.get("dup").is_some_and(|records| records.iter().all(|r| r.translated == "{{y}}"));
        expect_that!(all_filled, eq(true));
    }

    #[rstest]
    #[case(PlaceholderFailurePolicy::MarkKeyFailed, false, true)]
    #[case(PlaceholderFailurePolicy::PlaceholderOnly, true, false)]
    fn test_dispatch_all_placeholder_failure_policy(
        #[case] policy: PlaceholderFailurePolicy,
        #[case] expect_translated: bool,
        #[case] expect_failed: bool,
    ) {
        let flat = flat_map(&[("greet", "Hi {{name}}"), ("plain", "Bye")]);
        let translator = StubTranslator::new("-FR").failing_on("{{name}}");
        let mut variables = extract_placeholders(&flat);
        let mut log = SessionLog::new();

        let dispatched = tokio_test::block_on(dispatch_all(
            &translator,
            &flat,
            &mut variables,
            &options(policy),
            &mut log,
        ));

        assert_eq!(dispatched.translated.contains_key("greet"), expect_translated);
        assert_eq!(dispatched.failed.contains_key("greet"), expect_failed);
        if expect_failed {
            assert_eq!(dispatched.failed.get("greet").map(String::as_str), Some("Hi {{name}}"));
        }
        assert_eq!(dispatched.placeholder_failures, 1);
        assert_eq!(dispatched.translated.get("plain").map(String::as_str), Some("Bye-FR"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(1))]
    #[case(Some(3))]
    #[tokio::test]
    async fn test_dispatch_all_waits_for_slow_requests(#[case] concurrency: Option<usize>) {
        let flat = flat_map(&[("a", "slow"), ("b", "fast"), ("c", "fast too"), ("d", "broken")]);
        let translator = StubTranslator::new("!").failing_on("broken").delaying("slow", 30);
        let mut variables = VariableDictionary::new();
        let mut log = SessionLog::new();
        let opts = DispatchOptions { concurrency, ..options(PlaceholderFailurePolicy::MarkKeyFailed) };

        let dispatched = dispatch_all(&translator, &flat, &mut variables, &opts, &mut log).await;

        assert_eq!(dispatched.translated.len(), 3);
        assert_eq!(dispatched.translated.get("a").map(String::as_str), Some("slow!"));
        assert_eq!(dispatched.failed.len(), 1);
        assert_eq!(log.lines().last().map(String::as_str), Some("All translation requests settled"));
    }

    #[googletest::test]
    fn test_dispatch_all_empty_input() {
        let translator = StubTranslator::new("-FR");
        let mut variables = VariableDictionary::new();
        let mut log = SessionLog::new();

        let dispatched = tokio_test::block_on(dispatch_all(
            &translator,
            &FlatMap::new(),
            &mut variables,
            &options(PlaceholderFailurePolicy::MarkKeyFailed),
            &mut log,
        ));

        expect_that!(dispatched.translated.is_empty(), eq(true));
        expect_that!(dispatched.failed.is_empty(), eq(true));
        expect_that!(translator.calls(), eq(0));
    }
}
