//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::TOP_STORES_DEFAULT_LIMIT;
use crate::domain::ports::{StoreCatalogueQuery, StoreRegistrationCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: Arc<dyn StoreCatalogueQuery>,
    pub registration: Arc<dyn StoreRegistrationCommand>,
    /// Stores per listing page.
    pub page_size: u64,
    /// Entries returned by the top-stores ranking.
    pub top_stores_limit: usize,
}

impl HttpState {
    /// Construct state with the default page size and ranking limit.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use catalogue::domain::{StoreCatalogueService, StoreRegistrationService};
    /// use catalogue::inbound::http::state::HttpState;
    /// use catalogue::outbound::memory::InMemoryDocumentStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryDocumentStore::new());
    /// let state = HttpState::new(
    ///     Arc::new(StoreCatalogueService::new(Arc::clone(&store))),
    ///     Arc::new(StoreRegistrationService::new(store, Arc::new(DefaultClock))),
    /// )
    /// .with_page_size(6);
    /// assert_eq!(state.page_size, 6);
    /// ```
    pub fn new(
        catalogue: Arc<dyn StoreCatalogueQuery>,
        registration: Arc<dyn StoreRegistrationCommand>,
    ) -> Self {
        Self {
            catalogue,
            registration,
            page_size: DEFAULT_PAGE_SIZE,
            top_stores_limit: TOP_STORES_DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_top_stores_limit(mut self, limit: usize) -> Self {
        self.top_stores_limit = limit;
        self
    }
}
