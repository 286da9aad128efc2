//! Defensive field extraction from provider JSON
//!
//! Provider payloads are read as untyped [`serde_json::Value`] so a missing or
//! oddly-shaped field degrades to `None` instead of failing the whole parse.

use bookshelf_common::book::secure_url;
use serde_json::Value;

/// Non-empty string, or the `value` member of a `{"type": ..., "value": ...}` object.
pub fn text_value(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("value")?.as_str()?,
        _ => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// First candidate that yields text, in the order given.
pub fn first_text<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().find_map(text_value)
}

/// Largest available image URL.
///
/// `variants` lists the member names of `links` from largest to smallest. The
/// result always uses the https scheme.
pub fn cover_from_variants(links: Option<&Value>, variants: &[&str]) -> Option<String> {
    let links = links?.as_object()?;
    variants
        .iter()
        .filter_map(|name| links.get(*name)?.as_str())
        .find_map(secure_url)
}

/// Array of strings, skipping any non-string members.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `name` member of every object in an array, e.g. `[{"name": "..."}]`.
pub fn names(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("name")?.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Non-empty string member.
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
