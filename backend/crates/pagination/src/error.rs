//! Validation errors for page requests.

use thiserror::Error;

/// Errors raised when a page request cannot be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers start at one.
    #[error("page must be at least 1 (got {page})")]
    InvalidPage {
        /// The rejected page number.
        page: u64,
    },
    /// Pages must hold at least one item.
    #[error("page size must be at least 1 (got {page_size})")]
    InvalidPageSize {
        /// The rejected page size.
        page_size: u64,
    },
    /// The offset for the requested page does not fit in the address space.
    #[error("page {page} with size {page_size} is out of range")]
    OffsetOverflow {
        /// The requested page number.
        page: u64,
        /// The requested page size.
        page_size: u64,
    },
}
