//! Domain entities, validation, ports and services for the store catalogue.
//!
//! Public surface:
//! - [`Store`], [`Review`] and the read-side views built from them.
//! - [`Error`] / [`ErrorCode`]: the failure taxonomy every operation reports.
//! - [`ports`]: the driven [`ports::DocumentStore`] port and the driving
//!   query/command ports consumed by inbound adapters.
//! - [`StoreCatalogueService`] and [`StoreRegistrationService`]: the
//!   implementations of those driving ports.

pub mod catalogue;
pub mod error;
pub mod geo;
pub mod ports;
pub mod review;
pub mod slug;
pub mod store;
pub mod store_registration;
pub mod validation;

pub use self::catalogue::{
    NEARBY_RADIUS_METRES, NEARBY_RESULT_LIMIT, SEARCH_RESULT_LIMIT, StoreCatalogueService,
    TOP_STORES_DEFAULT_LIMIT,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::geo::{GeoPoint, GeoValidationError};
pub use self::review::{RATING_MAX, RATING_MIN, Rating, Review, ReviewDraft};
pub use self::slug::{candidate_slug, slug_pattern, slugify};
pub use self::store::{
    GeometryKind, Location, STORE_SUMMARY_FIELDS, ScoredStore, Store, StoreDetail, StoreDraft,
    StoreSummary, TagBrowse, TagCount, TopStore,
};
pub use self::store_registration::{DEFAULT_SLUG_RETRY_ATTEMPTS, StoreRegistrationService};
pub use self::validation::CatalogueValidationError;

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use catalogue::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("store cafe not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
