//! Conversions between domain entities and stored documents.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::error;

use crate::domain::ports::{Collection, Document, DocumentStoreError, PipelineStage};
use crate::domain::{Error, Review, Store};

/// Field under which joined reviews are attached to a store document.
pub(crate) const REVIEWS_FIELD: &str = "reviews";

pub(crate) fn map_store_error(error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Connection { message } => {
            Error::service_unavailable(format!("document store unavailable: {message}"))
        }
        DocumentStoreError::Timeout { operation } => {
            Error::service_unavailable(format!("document store {operation} timed out"))
        }
        DocumentStoreError::DuplicateKey { field, value } => {
            Error::conflict(format!("{field} {value} is already taken"))
                .with_details(json!({ "field": field, "value": value }))
        }
        DocumentStoreError::Query { message } => {
            Error::internal(format!("document store query failed: {message}"))
        }
        DocumentStoreError::Serialization { message } => {
            Error::internal(format!("document serialisation failed: {message}"))
        }
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Document, Error> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(Error::internal(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(err) => Err(Error::internal(format!("failed to encode document: {err}"))),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    collection: Collection,
    document: Document,
) -> Result<T, Error> {
    serde_json::from_value(Value::Object(document)).map_err(|err| {
        error!(%collection, error = %err, "stored document failed validation");
        Error::internal(format!("malformed {collection} document: {err}"))
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    documents: Vec<Document>,
) -> Result<Vec<T>, Error> {
    documents
        .into_iter()
        .map(|document| decode(collection, document))
        .collect()
}

/// Left join of every review onto its store via `storeId`.
pub(crate) fn reviews_lookup() -> PipelineStage {
    PipelineStage::Lookup {
        from: Collection::Reviews,
        local_field: "id".to_owned(),
        foreign_field: "storeId".to_owned(),
        as_field: REVIEWS_FIELD.to_owned(),
    }
}

/// Split a joined document into the store and the reviews attached by
/// [`reviews_lookup`].
pub(crate) fn decode_joined(mut document: Document) -> Result<(Store, Vec<Review>), Error> {
    let reviews = match document.remove(REVIEWS_FIELD) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(review) => decode(Collection::Reviews, review),
                other => Err(Error::internal(format!(
                    "joined review is not an object: {other}"
                ))),
            })
            .collect::<Result<Vec<Review>, Error>>()?,
        Some(other) => {
            return Err(Error::internal(format!(
                "joined reviews are not an array: {other}"
            )));
        }
    };
    let store = decode(Collection::Stores, document)?;
    Ok((store, reviews))
}
