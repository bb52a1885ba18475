//! Conversion between nested resource trees and dotted-key flat maps

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::{
    Map,
    Value,
};

/// Flattened resource: dotted path -> leaf text.
///
/// Kept sorted so every consumer walks the keys in the same order.
pub type FlatMap = BTreeMap<String, String>;

/// Characters with a meaning inside a flattened path, never allowed in the separator.
pub const RESERVED_PATH_CHARS: [char; 3] = [INDEX_OPEN, ']', ESCAPE];

/// Opens an array position
const INDEX_OPEN: char = '[';
/// Marks the next character as part of an object key
const ESCAPE: char = '\\';

/// Largest array position [`unflatten`] rebuilds. Larger `[n]` stay part of the key.
pub const MAX_ARRAY_INDEX: usize = 65_535;

/// Flatten nested JSON object into separator-joined key map.
///
/// Objects are walked depth first, arrays produce bracket indices (`items[0]`),
/// and every other value is a leaf. Empty strings are kept as leaves. A `[` or
/// `\` inside an object key is escaped with `\`, so `{"code[1]": ..}` flattens
/// to `code\[1]` and is not mistaken for an array position.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use locale_translator::input::flatten::flatten;
///
/// let tree = json!({
///     "greeting": {
///         "hello": "Hello",
///         "bye": "Goodbye"
///     }
/// });
///
/// let flat = flatten(&tree, ".");
/// assert_eq!(flat.get("greeting.hello"), Some(&"Hello".to_string()));
/// assert_eq!(flat.get("greeting.bye"), Some(&"Goodbye".to_string()));
/// ```
#[must_use]
pub fn flatten(tree: &Value, separator: &str) -> FlatMap {
    let mut result = FlatMap::new();
    flatten_value(tree, separator, None, &mut result);
    result
}

/// Recursive worker for [`flatten`].
fn flatten_value(json: &Value, separator: &str, prefix: Option<&str>, result: &mut FlatMap) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                if key.contains(separator) {
                    tracing::warn!(
                        key = %key,
                        separator = %separator,
                        "Key contains the separator; unflatten will split it"
                    );
                }
                let key = escape_key(key);
                let full_key =
                    prefix.map_or_else(|| key.to_string(), |p| format!("{p}{separator}{key}"));
                flatten_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                tracing::warn!(
                    key = %key,
                    value = %json,
                    "Non-string leaf will be translated and written back as a string"
                );
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}

/// `code[1]` -> `code\[1]`
fn escape_key(key: &str) -> Cow<'_, str> {
    if !key.contains([INDEX_OPEN, ESCAPE]) {
        return Cow::Borrowed(key);
    }
    let mut escaped = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c == INDEX_OPEN || c == ESCAPE {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// One step of a flattened path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    /// Object member name, unescaped
    Key(Cow<'a, str>),
    /// Array position
    Index(usize),
}

/// Split a flattened key back into path segments.
fn parse_path<'a>(key: &'a str, separator: &str) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    for part in key.split(separator) {
        let (name, indices) = split_indices(part);
        if !name.is_empty() || indices.is_empty() {
            segments.push(Segment::Key(name));
        }
        segments.extend(indices.into_iter().map(Segment::Index));
    }
    segments
}

/// `items[0][1]` -> (`items`, [0, 1]); `code\[1]` -> (`code[1]`, [])
///
/// Only an unescaped `[` that starts a run of `[digits]` reaching the end of
/// `part` opens array positions. Anything else is part of the name.
fn split_indices(part: &str) -> (Cow<'_, str>, Vec<usize>) {
    if !part.contains([INDEX_OPEN, ESCAPE]) {
        return (Cow::Borrowed(part), Vec::new());
    }

    let mut name = String::with_capacity(part.len());
    let mut chars = part.char_indices();
    while let Some((pos, c)) = chars.next() {
        match c {
            ESCAPE => name.push(chars.next().map_or(ESCAPE, |(_, next)| next)),
            INDEX_OPEN => {
                if let Some(indices) = part.get(pos..).and_then(trailing_indices) {
                    return (Cow::Owned(name), indices);
                }
                name.push(c);
            }
            _ => name.push(c),
        }
    }
    (Cow::Owned(name), Vec::new())
}

/// Parse `[0][12]` up to the end of `rest`.
fn trailing_indices(mut rest: &str) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix(INDEX_OPEN)?;
        let close = inner.find(']')?;
        let digits = inner.get(..close)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index = digits.parse::<usize>().ok().filter(|index| *index <= MAX_ARRAY_INDEX);
        let Some(index) = index else {
            tracing::warn!(
                position = %digits,
                max = MAX_ARRAY_INDEX,
                "Array position out of range, keeping it as part of the key"
            );
            return None;
        };
        indices.push(index);
        rest = inner.get(close + 1..)?;
    }
    Some(indices)
}

/// Rebuild the nested tree from a flat map.
///
/// Intermediate objects and arrays are created on demand. Entries are inserted
/// in the map's iteration order, which is also the key order of the produced
/// objects. When a leaf and a nested path collide (`a` and `a.b`), the entry
/// inserted last wins.
#[must_use]
pub fn unflatten(flat: &FlatMap, separator: &str) -> Value {
    let mut root = Value::Object(Map::new());
    for (key, value) in flat {
        let segments = parse_path(key, separator);
        insert_at(&mut root, &segments, value);
    }
    root
}

/// Place `leaf` at `segments` below `node`.
fn insert_at(node: &mut Value, segments: &[Segment<'_>], leaf: &str) {
    let Some((first, rest)) = segments.split_first() else {
        *node = Value::String(leaf.to_string());
        return;
    };

    let child = match first {
        Segment::Key(name) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return;
            };
            map.entry(name.to_string()).or_insert(Value::Null)
        }
        Segment::Index(index) => {
            let index = *index;
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            let Value::Array(items) = node else {
                return;
            };
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            let Some(child) = items.get_mut(index) else {
                return;
            };
            child
        }
    };

    insert_at(child, rest, leaf);
}

/// Count the leaves [`flatten`] would produce.
#[must_use]
pub fn leaf_count(tree: &Value) -> usize {
    match tree {
        Value::Object(map) => map.values().map(leaf_count).sum(),
        Value::Array(arr) => arr.iter().map(leaf_count).sum(),
        _ => 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{
        self,
        Write,
    };
    use std::sync::{
        Arc,
        Mutex,
    };

    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn test_flatten_simple() {
        let tree = json!({
            "hello": "Hello",
            "goodbye": "Goodbye"
        });

        let result = flatten(&tree, ".");

        expect_that!(result.get("hello"), some(eq(&"Hello".to_string())));
        expect_that!(result.get("goodbye"), some(eq(&"Goodbye".to_string())));
        expect_that!(result.len(), eq(2));
    }

    #[googletest::test]
    fn test_flatten_deep_nested() {
        let tree = json!({
            "a": {
                "b": {
                    "c": {
                        "d": "Deep value"
                    }
                }
            }
        });

        let result = flatten(&tree, ".");

        expect_that!(result.get("a.b.c.d"), some(eq(&"Deep value".to_string())));
        expect_that!(result.len(), eq(1));
    }

    #[googletest::test]
    fn test_flatten_keeps_empty_and_zero_leaves() {
        let tree = json!({
            "empty": "",
            "zero": "0",
            "number": 0
        });

        let result = flatten(&tree, ".");

        expect_that!(result.get("empty"), some(eq(&String::new())));
        expect_that!(result.get("zero"), some(eq(&"0".to_string())));
        expect_that!(result.get("number"), some(eq(&"0".to_string())));
        expect_that!(result.len(), eq(3));
    }

    /// Shared buffer receiving formatted log output
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[googletest::test]
    fn test_flatten_warns_on_non_string_leaf() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            flatten(&json!({ "max": 5, "label": "x" }), ".")
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        expect_that!(result.get("max"), some(eq(&"5".to_string())));
        assert!(output.contains("Non-string leaf"), "{output}");
        assert!(output.contains("key=max"), "{output}");
        assert!(!output.contains("key=label"), "{output}");
    }

    #[googletest::test]
    fn test_flatten_custom_separator() {
        let tree = json!({ "common": { "hello": "Hello" } });

        let result = flatten(&tree, "_");

        expect_that!(result.get("common_hello"), some(eq(&"Hello".to_string())));
    }

    #[googletest::test]
    fn test_flatten_array_of_objects() {
        let tree = json!({
            "users": [
                { "name": "Alice" },
                { "name": "Bob" }
            ]
        });

        let result = flatten(&tree, ".");

        expect_that!(result.get("users[0].name"), some(eq(&"Alice".to_string())));
        expect_that!(result.get("users[1].name"), some(eq(&"Bob".to_string())));
    }

    #[rstest]
    #[case(json!({ "a": "1" }))]
    #[case(json!({ "greeting": { "hello": "Hi {{name}}", "bye": "" } }))]
    #[case(json!({ "a": { "b": { "c": "x" } }, "d": "y", "e": { "f": "z" } }))]
    #[case(json!({ "menu": { "items": ["one", "two"] } }))]
    #[case(json!({ "matrix": [["a", "b"], ["c", "d"]] }))]
    #[case(json!({ "users": [{ "name": "Alice" }, { "name": "Bob", "role": "admin" }] }))]
    fn test_unflatten_inverts_flatten(#[case] tree: Value) {
        let flat = flatten(&tree, ".");

        assert_eq!(flat.len(), leaf_count(&tree));
        assert_eq!(unflatten(&flat, "."), tree);
    }

    #[rstest]
    #[case(".")]
    #[case("/")]
    #[case("::")]
    fn test_unflatten_with_separator(#[case] separator: &str) {
        let tree = json!({ "errors": { "http": { "404": "Not found" } } });

        let flat = flatten(&tree, separator);

        assert_eq!(unflatten(&flat, separator), tree);
    }

    #[googletest::test]
    fn test_unflatten_orders_keys_by_flat_key() {
        let flat: FlatMap =
            [("b.x", "2"), ("a.y", "1")].into_iter().map(|(k, v)| (k.into(), v.into())).collect();

        let tree = unflatten(&flat, ".");

        let serialized = serde_json::to_string(&tree).unwrap();
        assert_eq!(serialized, r#"{"a":{"y":"1"},"b":{"x":"2"}}"#);
    }

    #[googletest::test]
    fn test_unflatten_nested_path_replaces_leaf() {
        let flat: FlatMap = [("a", "leaf"), ("a.b", "nested")]
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let tree = unflatten(&flat, ".");

        assert_eq!(tree, json!({ "a": { "b": "nested" } }));
    }

    #[googletest::test]
    fn test_unflatten_sparse_array_fills_gaps() {
        let flat: FlatMap = [("items[1]".to_string(), "second".to_string())].into_iter().collect();

        let tree = unflatten(&flat, ".");

        assert_eq!(tree, json!({ "items": [null, "second"] }));
    }

    #[rstest]
    #[case("items", "items", vec![])]
    #[case("items[0]", "items", vec![0])]
    #[case("matrix[1][2]", "matrix", vec![1, 2])]
    #[case("odd[x]", "odd[x]", vec![])]
    #[case("[3]", "", vec![3])]
    #[case(r"code\[1]", "code[1]", vec![])]
    #[case(r"code\[1][0]", "code[1]", vec![0])]
    #[case(r"back\\slash", r"back\slash", vec![])]
    #[case("a[0]b", "a[0]b", vec![])]
    #[case("a[]", "a[]", vec![])]
    #[case("a[+1]", "a[+1]", vec![])]
    #[case("code[65536]", "code[65536]", vec![])]
    #[case("code[18446744073709551616]", "code[18446744073709551616]", vec![])]
    fn test_split_indices(#[case] part: &str, #[case] name: &str, #[case] indices: Vec<usize>) {
        let (parsed_name, parsed_indices) = split_indices(part);

        assert_eq!(parsed_name, name);
        assert_eq!(parsed_indices, indices);
    }

    #[googletest::test]
    fn test_flatten_escapes_brackets_in_keys() {
        let tree = json!({ "errors": { "code[1]": "Oops", r"path\to": "x" } });

        let result = flatten(&tree, ".");

        expect_that!(result.get(r"errors.code\[1]"), some(eq(&"Oops".to_string())));
        expect_that!(result.get(r"errors.path\\to"), some(eq(&"x".to_string())));
    }

    #[rstest]
    #[case(json!({ "errors": { "code[1]": "Oops" } }))]
    #[case(json!({ "code[1]": "x" }))]
    #[case(json!({ "list[0]": ["a", "b"] }))]
    #[case(json!({ r"C:\temp": { "[x]": "y" } }))]
    #[case(json!({ "code[1152921504606846976]": "big" }))]
    fn test_unflatten_keeps_bracketed_keys(#[case] tree: Value) {
        let flat = flatten(&tree, ".");

        assert_eq!(unflatten(&flat, "."), tree);
    }

    #[rstest]
    #[case("code[1152921504606846976]")]
    #[case("code[18446744073709551615]")]
    #[case("items[65536]")]
    fn test_unflatten_huge_index_stays_in_key(#[case] key: &str) {
        let flat: FlatMap = [(key.to_string(), "x".to_string())].into_iter().collect();

        let tree = unflatten(&flat, ".");

        let mut expected = Map::new();
        expected.insert(key.to_string(), json!("x"));
        assert_eq!(tree, Value::Object(expected));
    }

    #[googletest::test]
    fn test_unflatten_largest_index_is_rebuilt() {
        let key = format!("items[{MAX_ARRAY_INDEX}]");
        let flat: FlatMap = [(key, "last".to_string())].into_iter().collect();

        let tree = unflatten(&flat, ".");

        let items = tree.get("items").and_then(Value::as_array).unwrap();
        expect_that!(items.len(), eq(MAX_ARRAY_INDEX + 1));
        expect_that!(items.last(), some(eq(&json!("last"))));
    }

    #[rstest]
    #[case(json!({}), 0)]
    #[case(json!({ "a": "1", "b": { "c": "2", "d": "3" } }), 3)]
    #[case(json!({ "a": ["x", "y"], "b": "" }), 3)]
    fn test_leaf_count(#[case] tree: Value, #[case] expected: usize) {
        assert_eq!(leaf_count(&tree), expected);
        assert_eq!(flatten(&tree, ".").len(), expected);
    }
}
