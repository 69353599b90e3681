//! Filter evaluation against in-memory documents.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::domain::GeoPoint;
use crate::domain::ports::{Document, DocumentStoreError, Filter};

use super::values::{field_equals, lookup, point_at, tokenise};

/// Fields covered by the text index.
pub(super) const TEXT_INDEX_FIELDS: [&str; 2] = ["name", "description"];

/// A [`Filter`] with its regular expressions compiled once per query.
#[derive(Debug)]
pub(super) enum Matcher {
    All,
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Contains { field: String, value: Value },
    Exists { field: String },
    Pattern { field: String, regex: Regex },
    Text { terms: Vec<String> },
    Near {
        field: String,
        origin: GeoPoint,
        max_distance_metres: f64,
    },
    And(Vec<Matcher>),
}

impl Matcher {
    pub(super) fn compile(filter: &Filter) -> Result<Self, DocumentStoreError> {
        Ok(match filter {
            Filter::All => Self::All,
            Filter::Eq { field, value } => Self::Eq {
                field: field.clone(),
                value: value.clone(),
            },
            Filter::Ne { field, value } => Self::Ne {
                field: field.clone(),
                value: value.clone(),
            },
            Filter::Contains { field, value } => Self::Contains {
                field: field.clone(),
                value: value.clone(),
            },
            Filter::Exists { field } => Self::Exists {
                field: field.clone(),
            },
            Filter::Pattern {
                field,
                pattern,
                case_insensitive,
            } => Self::Pattern {
                field: field.clone(),
                regex: RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .map_err(|err| DocumentStoreError::query(err.to_string()))?,
            },
            Filter::Text { query } => {
                let mut terms = tokenise(query);
                terms.sort();
                terms.dedup();
                Self::Text { terms }
            }
            Filter::Near {
                field,
                origin,
                max_distance_metres,
            } => Self::Near {
                field: field.clone(),
                origin: *origin,
                max_distance_metres: *max_distance_metres,
            },
            Filter::And(inner) => Self::And(
                inner
                    .iter()
                    .map(Self::compile)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    pub(super) fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => field_equals(document, field, value),
            Self::Ne { field, value } => !field_equals(document, field, value),
            Self::Contains { field, value } => lookup(document, field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
            Self::Exists { field } => lookup(document, field).is_some(),
            Self::Pattern { field, regex } => lookup(document, field)
                .and_then(Value::as_str)
                .is_some_and(|text| regex.is_match(text)),
            Self::Text { .. } => self.text_score(document).is_some_and(|score| score > 0.0),
            Self::Near {
                field,
                origin,
                max_distance_metres,
            } => point_at(document, field)
                .is_some_and(|point| origin.distance_metres(&point) <= *max_distance_metres),
            Self::And(inner) => inner.iter().all(|matcher| matcher.matches(document)),
        }
    }

    /// Relevance of `document` for the first text clause, if any.
    ///
    /// Each indexed field contributes `hits * (1 + 1 / words)`, so a hit in a
    /// short field outranks the same hit in a long one.
    pub(super) fn text_score(&self, document: &Document) -> Option<f64> {
        match self {
            Self::Text { terms } => Some(
                TEXT_INDEX_FIELDS
                    .iter()
                    .filter_map(|field| lookup(document, field).and_then(Value::as_str))
                    .map(|text| {
                        let words = tokenise(text);
                        let hits = words
                            .iter()
                            .filter(|word| terms.binary_search(word).is_ok())
                            .count();
                        if hits == 0 {
                            0.0
                        } else {
                            hits as f64 * (1.0 + 1.0 / words.len() as f64)
                        }
                    })
                    .sum(),
            ),
            Self::And(inner) => inner.iter().find_map(|matcher| matcher.text_score(document)),
            _ => None,
        }
    }

    /// Distance from the first proximity clause's origin, if any.
    pub(super) fn distance(&self, document: &Document) -> Option<f64> {
        match self {
            Self::Near { field, origin, .. } => {
                point_at(document, field).map(|point| origin.distance_metres(&point))
            }
            Self::And(inner) => inner.iter().find_map(|matcher| matcher.distance(document)),
            _ => None,
        }
    }

    pub(super) fn has_proximity(&self) -> bool {
        match self {
            Self::Near { .. } => true,
            Self::And(inner) => inner.iter().any(Self::has_proximity),
            _ => false,
        }
    }
}
