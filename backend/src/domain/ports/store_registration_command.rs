//! Driving port for creating and editing stores.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Error, Store};

/// Caller-supplied store fields. Identity, slug and timestamps are assigned
/// by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSubmission {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub address: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub author_id: Uuid,
}

/// Write-side store operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRegistrationCommand: Send + Sync {
    /// Validate and persist a new store with a freshly resolved slug.
    async fn create_store(&self, submission: StoreSubmission) -> Result<Store, Error>;

    /// Replace the editable fields of an existing store.
    ///
    /// The slug is re-resolved only when the name changes.
    async fn update_store(&self, id: Uuid, submission: StoreSubmission) -> Result<Store, Error>;
}
