//! Startup fixture loading.
//!
//! A seed file is a JSON object with `stores` and `reviews` arrays. Every
//! entry passes through the same validation as stored documents, so a bad
//! fixture fails startup instead of surfacing later as an internal error.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{Collection, DocumentStore, DocumentStoreError};
use crate::domain::{Review, Store};

/// Stores and reviews read from a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedCatalogue {
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Failures while loading or applying a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("seed file {path} is not a valid catalogue: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode seed {collection} document: {message}")]
    Encode {
        collection: Collection,
        message: String,
    },
    #[error("failed to write seed {collection} document: {source}")]
    Write {
        collection: Collection,
        #[source]
        source: DocumentStoreError,
    },
}

fn parent_and_file_name(path: &Path) -> io::Result<(&Path, &Path)> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path {} has no file name", path.display()),
        )
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((parent, Path::new(file_name)))
}

fn read_to_string(path: &Path) -> io::Result<String> {
    let (parent, file_name) = parent_and_file_name(path)?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read_to_string(file_name)
}

/// Read and validate a seed file.
pub fn load_seed_file(path: &Path) -> Result<SeedCatalogue, SeedError> {
    let raw = read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn to_document<T: serde::Serialize>(
    collection: Collection,
    value: &T,
) -> Result<crate::domain::ports::Document, SeedError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(SeedError::Encode {
            collection,
            message: format!("expected an object, got {other}"),
        }),
        Err(err) => Err(SeedError::Encode {
            collection,
            message: err.to_string(),
        }),
    }
}

/// Insert every seeded store, then every review.
pub async fn seed_store<S>(store: &S, seed: &SeedCatalogue) -> Result<(), SeedError>
where
    S: DocumentStore + ?Sized,
{
    for entry in &seed.stores {
        let document = to_document(Collection::Stores, entry)?;
        store
            .insert(Collection::Stores, document)
            .await
            .map_err(|source| SeedError::Write {
                collection: Collection::Stores,
                source,
            })?;
    }
    for entry in &seed.reviews {
        let document = to_document(Collection::Reviews, entry)?;
        store
            .insert(Collection::Reviews, document)
            .await
            .map_err(|source| SeedError::Write {
                collection: Collection::Reviews,
                source,
            })?;
    }
    info!(
        stores = seed.stores.len(),
        reviews = seed.reviews.len(),
        "catalogue seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::memory::InMemoryDocumentStore;
    use rstest::rstest;
    use std::io::Write;

    const SEED: &str = r#"{
        "stores": [{
            "id": "6f1c1a52-1f0e-4a4b-9a55-4a7f0f4f2d11",
            "name": "Cafe",
            "slug": "cafe",
            "tags": ["Wifi"],
            "created": "2024-01-01T00:00:00Z",
            "location": { "type": "Point", "coordinates": [-3.19, 55.95], "address": "1 High Street" },
            "authorId": "00000000-0000-0000-0000-000000000000"
        }],
        "reviews": [{
            "id": "0d6f8f0e-4f5e-4c1b-8d55-0e1d9f3c2a10",
            "text": "Great coffee",
            "created": "2024-01-02T00:00:00Z",
            "authorId": "00000000-0000-0000-0000-000000000000",
            "rating": 5,
            "storeId": "6f1c1a52-1f0e-4a4b-9a55-4a7f0f4f2d11"
        }]
    }"#;

    fn write_seed(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write seed");
        file
    }

    #[tokio::test]
    async fn loads_and_applies_a_seed_file() {
        let file = write_seed(SEED);
        let seed = load_seed_file(file.path()).expect("seed parses");
        let store = InMemoryDocumentStore::new();

        seed_store(&store, &seed).await.expect("seed applied");

        assert_eq!(store.document_count(Collection::Stores).await, 1);
        assert_eq!(store.document_count(Collection::Reviews).await, 1);
    }

    #[rstest]
    #[case::not_json("not json")]
    #[case::bad_rating(r#"{ "reviews": [{ "id": "0d6f8f0e-4f5e-4c1b-8d55-0e1d9f3c2a10",
        "text": "x", "created": "2024-01-02T00:00:00Z",
        "authorId": "00000000-0000-0000-0000-000000000000", "rating": 9,
        "storeId": "6f1c1a52-1f0e-4a4b-9a55-4a7f0f4f2d11" }] }"#)]
    fn rejects_invalid_seed_files(#[case] contents: &str) {
        let file = write_seed(contents);
        let error = load_seed_file(file.path()).expect_err("invalid seed");
        assert!(matches!(error, SeedError::Parse { .. }));
    }

    #[rstest]
    fn missing_files_are_read_errors() {
        let directory = tempfile::tempdir().expect("temp dir");
        let error = load_seed_file(&directory.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, SeedError::Read { .. }));
    }

    #[tokio::test]
    async fn duplicate_slugs_fail_seeding() {
        let file = write_seed(SEED);
        let seed = load_seed_file(file.path()).expect("seed parses");
        let store = InMemoryDocumentStore::new();
        seed_store(&store, &seed).await.expect("first seed");

        let error = seed_store(&store, &seed).await.expect_err("duplicate");

        assert!(matches!(error, SeedError::Write { collection: Collection::Stores, .. }));
    }
}
