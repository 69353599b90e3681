//! Query execution over snapshots of the in-memory collections.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::domain::ports::{
    Collection, Document, DocumentStoreError, FindQuery, GROUP_COUNT_FIELD, GROUP_KEY_FIELD,
    PipelineStage, SCORE_FIELD, SortDirection, SortKey,
};

use super::matcher::Matcher;
use super::values::{compare, lookup, replace_at};

/// Read access to every collection for the duration of one query.
pub(super) trait CollectionSource {
    fn documents(&self, collection: Collection) -> &[Document];
}

struct Candidate {
    document: Document,
    score: Option<f64>,
    distance: Option<f64>,
}

fn compare_candidates(a: &Candidate, b: &Candidate, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| match key {
            SortKey::Field { field, direction } => {
                let ordering = compare(lookup(&a.document, field), lookup(&b.document, field));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
            SortKey::TextScore => b
                .score
                .unwrap_or_default()
                .total_cmp(&a.score.unwrap_or_default()),
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn project(document: Document, fields: Option<&[String]>) -> Document {
    match fields {
        None => document,
        Some(fields) => document
            .into_iter()
            .filter(|(key, _)| fields.iter().any(|field| field == key))
            .collect(),
    }
}

/// Execute a `find` against `documents`.
pub(super) fn run_find(
    documents: &[Document],
    query: &FindQuery,
) -> Result<Vec<Document>, DocumentStoreError> {
    let matcher = Matcher::compile(query.filter())?;
    let mut candidates: Vec<Candidate> = documents
        .iter()
        .filter(|document| matcher.matches(document))
        .map(|document| Candidate {
            score: matcher.text_score(document),
            distance: matcher.distance(document),
            document: document.clone(),
        })
        .collect();

    if query.sort_keys().is_empty() {
        if matcher.has_proximity() {
            candidates.sort_by(|a, b| {
                a.distance
                    .unwrap_or(f64::INFINITY)
                    .total_cmp(&b.distance.unwrap_or(f64::INFINITY))
            });
        }
    } else {
        candidates.sort_by(|a, b| compare_candidates(a, b, query.sort_keys()));
    }

    let limit = query.limit_value().map_or(usize::MAX, to_usize);
    Ok(candidates
        .into_iter()
        .skip(to_usize(query.skip_value()))
        .take(limit)
        .map(|candidate| {
            let mut document = project(candidate.document, query.projection_fields());
            if query.wants_text_score() {
                document.insert(SCORE_FIELD.to_owned(), json!(candidate.score.unwrap_or_default()));
            }
            document
        })
        .collect())
}

fn unwind(documents: Vec<Document>, field: &str) -> Vec<Document> {
    documents
        .into_iter()
        .flat_map(|document| match lookup(&document, field).cloned() {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| {
                    let mut copy = document.clone();
                    replace_at(&mut copy, field, item);
                    copy
                })
                .collect(),
            Some(_) => vec![document],
        })
        .collect()
}

fn group_count(documents: &[Document], field: &str) -> Vec<Document> {
    let mut groups: BTreeMap<String, (Value, u64)> = BTreeMap::new();
    for document in documents {
        let key = lookup(document, field).cloned().unwrap_or(Value::Null);
        groups
            .entry(key.to_string())
            .or_insert_with(|| (key, 0))
            .1 += 1;
    }
    groups
        .into_values()
        .map(|(key, count)| {
            let mut row = Document::new();
            row.insert(GROUP_KEY_FIELD.to_owned(), key);
            row.insert(GROUP_COUNT_FIELD.to_owned(), json!(count));
            row
        })
        .collect()
}

fn join(
    documents: Vec<Document>,
    foreign: &[Document],
    local_field: &str,
    foreign_field: &str,
    as_field: &str,
) -> Vec<Document> {
    documents
        .into_iter()
        .map(|mut document| {
            let local = lookup(&document, local_field).cloned().unwrap_or(Value::Null);
            let joined: Vec<Value> = foreign
                .iter()
                .filter(|other| lookup(other, foreign_field).cloned().unwrap_or(Value::Null) == local)
                .cloned()
                .map(Value::Object)
                .collect();
            document.insert(as_field.to_owned(), Value::Array(joined));
            document
        })
        .collect()
}

/// Execute an aggregation pipeline starting from `collection`.
pub(super) fn run_pipeline(
    source: &impl CollectionSource,
    collection: Collection,
    pipeline: &[PipelineStage],
) -> Result<Vec<Document>, DocumentStoreError> {
    let mut documents = source.documents(collection).to_vec();
    for stage in pipeline {
        documents = match stage {
            PipelineStage::Match(filter) => {
                let matcher = Matcher::compile(filter)?;
                documents
                    .into_iter()
                    .filter(|document| matcher.matches(document))
                    .collect()
            }
            PipelineStage::Unwind { field } => unwind(documents, field),
            PipelineStage::GroupCount { field } => group_count(&documents, field),
            PipelineStage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => join(
                documents,
                source.documents(*from),
                local_field,
                foreign_field,
                as_field,
            ),
            PipelineStage::Sort(keys) => {
                let mut candidates: Vec<Candidate> = documents
                    .into_iter()
                    .map(|document| Candidate {
                        document,
                        score: None,
                        distance: None,
                    })
                    .collect();
                candidates.sort_by(|a, b| compare_candidates(a, b, keys));
                candidates.into_iter().map(|candidate| candidate.document).collect()
            }
            PipelineStage::Limit(limit) => {
                documents.truncate(to_usize(*limit));
                documents
            }
        };
    }
    Ok(documents)
}
