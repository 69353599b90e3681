//! Unique slug assignment for store names.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::documents::map_store_error;
use crate::domain::ports::{Collection, DocumentStore, Filter};
use crate::domain::slug::{candidate_slug, slug_pattern, slugify};
use crate::domain::{CatalogueValidationError, Error};

/// Derives a slug for a store name that does not collide with the slugs
/// already in the catalogue.
///
/// Resolution counts the existing `base` / `base-N` slugs and appends
/// `count + 1`. The read and the later write are not atomic; the store's
/// unique slug index rejects a losing writer and the caller re-resolves.
pub struct SlugResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for SlugResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SlugResolver<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve a slug for `name`, ignoring the store `exclude` when counting
    /// collisions so a store never collides with itself on rename.
    ///
    /// # Errors
    /// Returns `invalid_request` when the name has no sluggable characters
    /// and maps store failures through the usual taxonomy.
    pub async fn resolve(&self, name: &str, exclude: Option<Uuid>) -> Result<String, Error> {
        let base = slugify(name);
        if base.is_empty() {
            return Err(CatalogueValidationError::UnsluggableName { field: "name" }.into());
        }
        let mut filters = vec![Filter::pattern("slug", slug_pattern(&base))];
        if let Some(id) = exclude {
            filters.push(Filter::ne("id", id.to_string()));
        }
        let existing = self
            .store
            .count(Collection::Stores, &Filter::and(filters))
            .await
            .map_err(map_store_error)?;
        let slug = candidate_slug(&base, existing);
        debug!(%base, existing, %slug, "resolved store slug");
        Ok(slug)
    }
}
