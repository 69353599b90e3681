//! Store creation and editing.
//!
//! Writes are the only place slugs are assigned. The resolver's
//! count-then-write sequence can race with a concurrent writer; the store's
//! unique slug index turns the loser's write into a duplicate-key failure,
//! and this service re-resolves and retries a bounded number of times.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::catalogue::SlugResolver;
use super::catalogue::documents::{decode, encode, map_store_error};
use super::ports::{
    Collection, DocumentStore, DocumentStoreError, Filter, FindQuery, StoreRegistrationCommand,
    StoreSubmission,
};
use super::validation::{normalise_tags, trimmed_non_empty, trimmed_optional};
use super::{CatalogueValidationError, Error, GeoPoint, Location, Store, StoreDraft};

/// Slug assignment attempts made before a write gives up with a conflict.
pub const DEFAULT_SLUG_RETRY_ATTEMPTS: u32 = 3;

/// Submission fields after validation, ready to become a [`Store`].
#[derive(Debug, Clone)]
struct ValidatedSubmission {
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    location: Location,
    photo: Option<String>,
    author_id: Uuid,
}

impl ValidatedSubmission {
    fn parse(submission: StoreSubmission) -> Result<Self, CatalogueValidationError> {
        let name = trimmed_non_empty(&submission.name, "name")?;
        let point = GeoPoint::new(submission.longitude, submission.latitude)?;
        let location = Location::new(point, &submission.address)?;
        Ok(Self {
            name,
            description: trimmed_optional(submission.description),
            tags: normalise_tags(submission.tags),
            location,
            photo: trimmed_optional(submission.photo),
            author_id: submission.author_id,
        })
    }

    fn into_store(
        self,
        id: Uuid,
        slug: String,
        created: DateTime<Utc>,
        author_id: Uuid,
    ) -> Result<Store, Error> {
        Store::new(StoreDraft {
            id,
            name: self.name,
            slug,
            description: self.description,
            tags: self.tags,
            created,
            location: self.location,
            photo: self.photo,
            author_id,
        })
        .map_err(Error::from)
    }
}

#[derive(Debug, Clone, Copy)]
enum WriteMode {
    Insert,
    Replace,
}

enum WriteFailure {
    SlugTaken(String),
    Failed(Error),
}

/// Write-side service implementing [`StoreRegistrationCommand`].
pub struct StoreRegistrationService<S> {
    store: Arc<S>,
    slugs: SlugResolver<S>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl<S> Clone for StoreRegistrationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            slugs: self.slugs.clone(),
            clock: Arc::clone(&self.clock),
            max_attempts: self.max_attempts,
        }
    }
}

impl<S> StoreRegistrationService<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            slugs: SlugResolver::new(Arc::clone(&store)),
            store,
            clock,
            max_attempts: DEFAULT_SLUG_RETRY_ATTEMPTS,
        }
    }

    /// Override the number of slug assignment attempts (at least one).
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    async fn load(&self, id: Uuid) -> Result<Store, Error> {
        let query = FindQuery::new(Filter::eq("id", id.to_string())).limit(1);
        let document = self
            .store
            .find(Collection::Stores, &query)
            .await
            .map_err(map_store_error)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::not_found(format!("store {id} not found")).with_details(json!({ "id": id }))
            })?;
        decode(Collection::Stores, document)
    }

    async fn write(&self, mode: WriteMode, store: &Store) -> Result<(), WriteFailure> {
        let document = encode(store).map_err(WriteFailure::Failed)?;
        let result = match mode {
            WriteMode::Insert => self.store.insert(Collection::Stores, document).await.map(|()| true),
            WriteMode::Replace => {
                self.store
                    .replace(Collection::Stores, store.id(), document)
                    .await
            }
        };
        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err(WriteFailure::Failed(
                Error::not_found(format!("store {} not found", store.id()))
                    .with_details(json!({ "id": store.id() })),
            )),
            Err(DocumentStoreError::DuplicateKey { field, value }) if field == "slug" => {
                Err(WriteFailure::SlugTaken(value))
            }
            Err(error) => Err(WriteFailure::Failed(map_store_error(error))),
        }
    }

    /// Resolve a slug, build the store and write it, re-resolving when a
    /// concurrent writer claims the slug first.
    async fn save_with_unique_slug<F>(
        &self,
        name: &str,
        exclude: Option<Uuid>,
        mode: WriteMode,
        build: F,
    ) -> Result<Store, Error>
    where
        F: Fn(String) -> Result<Store, Error> + Send + Sync,
    {
        for attempt in 1..=self.max_attempts {
            let slug = self.slugs.resolve(name, exclude).await?;
            let store = build(slug)?;
            match self.write(mode, &store).await {
                Ok(()) => return Ok(store),
                Err(WriteFailure::SlugTaken(slug)) => {
                    warn!(attempt, %slug, "slug claimed concurrently; re-resolving");
                }
                Err(WriteFailure::Failed(error)) => return Err(error),
            }
        }
        Err(Error::conflict(format!(
            "could not assign a unique slug for {name} after {} attempts",
            self.max_attempts
        ))
        .with_details(json!({ "field": "slug", "attempts": self.max_attempts })))
    }
}

#[async_trait]
impl<S> StoreRegistrationCommand for StoreRegistrationService<S>
where
    S: DocumentStore,
{
    async fn create_store(&self, submission: StoreSubmission) -> Result<Store, Error> {
        let fields = ValidatedSubmission::parse(submission)?;
        let id = Uuid::new_v4();
        let created = self.clock.utc();
        let author_id = fields.author_id;
        let name = fields.name.clone();
        let store = self
            .save_with_unique_slug(&name, None, WriteMode::Insert, |slug| {
                fields.clone().into_store(id, slug, created, author_id)
            })
            .await?;
        info!(id = %store.id(), slug = store.slug(), "store created");
        Ok(store)
    }

    async fn update_store(&self, id: Uuid, submission: StoreSubmission) -> Result<Store, Error> {
        let fields = ValidatedSubmission::parse(submission)?;
        let existing = self.load(id).await?;
        let created = existing.created();
        let author_id = existing.author_id();

        let store = if fields.name == existing.name() {
            let store = fields.into_store(id, existing.slug().to_owned(), created, author_id)?;
            match self.write(WriteMode::Replace, &store).await {
                Ok(()) => store,
                Err(WriteFailure::SlugTaken(slug)) => {
                    return Err(Error::conflict(format!("slug {slug} is already taken"))
                        .with_details(json!({ "field": "slug", "value": slug })));
                }
                Err(WriteFailure::Failed(error)) => return Err(error),
            }
        } else {
            let name = fields.name.clone();
            self.save_with_unique_slug(&name, Some(id), WriteMode::Replace, |slug| {
                fields.clone().into_store(id, slug, created, author_id)
            })
            .await?
        };
        info!(id = %store.id(), slug = store.slug(), "store updated");
        Ok(store)
    }
}

#[cfg(test)]
#[path = "store_registration_tests.rs"]
mod tests;
