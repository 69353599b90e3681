//! Field access and ordering over JSON documents.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::GeoPoint;
use crate::domain::ports::Document;

/// Resolve a dotted path such as `location.coordinates`.
pub(super) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = document.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Replace the value at a dotted path, creating nothing when a parent is
/// missing.
pub(super) fn replace_at(document: &mut Document, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            document.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(child)) = document.get_mut(head) {
                replace_at(child, rest, value);
            }
        }
    }
}

/// Equality with array membership, so `tags = "Wifi"` matches a document
/// whose tags contain `"Wifi"`.
pub(super) fn field_equals(document: &Document, path: &str, expected: &Value) -> bool {
    match lookup(document, path) {
        Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
        Some(actual) => actual == expected,
        None => expected.is_null(),
    }
}

/// Read a GeoJSON point or a bare `[lng, lat]` pair.
pub(super) fn point_at(document: &Document, path: &str) -> Option<GeoPoint> {
    let value = lookup(document, path)?;
    let pair = match value {
        Value::Object(geometry) => geometry.get("coordinates")?,
        other => other,
    };
    match pair.as_array()?.as_slice() {
        [lng, lat] => GeoPoint::new(lng.as_f64()?, lat.as_f64()?).ok(),
        _ => None,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

/// Total order over optional JSON values: missing and null first, then
/// numbers, strings (timestamps compared chronologically), objects, arrays
/// and booleans.
pub(super) fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(tx), Some(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => x
            .iter()
            .zip(y.iter())
            .map(|(left, right)| compare(Some(left), Some(right)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Lowercase alphanumeric words of `text`.
pub(super) fn tokenise(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
