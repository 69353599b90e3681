//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod store_catalogue_query;
mod store_registration_command;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    Collection, Document, DocumentStore, DocumentStoreError, Filter, FindQuery,
    FixtureDocumentStore, GROUP_COUNT_FIELD, GROUP_KEY_FIELD, PipelineStage, SCORE_FIELD,
    SortDirection, SortKey,
};
#[cfg(test)]
pub use store_catalogue_query::MockStoreCatalogueQuery;
pub use store_catalogue_query::StoreCatalogueQuery;
#[cfg(test)]
pub use store_registration_command::MockStoreRegistrationCommand;
pub use store_registration_command::{StoreRegistrationCommand, StoreSubmission};
