//! Validated page requests and their offset windows.

use crate::envelope::{Page, PageOutcome, total_pages};
use crate::error::PaginationError;

/// Page size used when callers do not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 4;

/// A one-based page number paired with a positive page size.
///
/// The offset (`(page - 1) * page_size`) is checked at construction so the
/// window can always be handed to a data store without further validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
    offset: u64,
}

impl PageRequest {
    /// Validate a page number and page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for page zero,
    /// [`PaginationError::InvalidPageSize`] for a zero page size, and
    /// [`PaginationError::OffsetOverflow`] when the offset does not fit in
    /// a `u64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(3, 4).expect("valid request");
    /// assert_eq!(request.offset(), 8);
    /// assert!(PageRequest::new(0, 4).is_err());
    /// ```
    pub fn new(page: u64, page_size: u64) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage { page });
        }
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize { page_size });
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or(PaginationError::OffsetOverflow { page, page_size })?;
        Ok(Self {
            page,
            page_size,
            offset,
        })
    }

    /// Request the given page using [`DEFAULT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for page zero.
    pub fn with_default_size(page: u64) -> Result<Self, PaginationError> {
        Self::new(page, DEFAULT_PAGE_SIZE)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Combine a fetched window with the collection's total count.
    ///
    /// An empty window is an overflow only when the caller asked for a page
    /// beyond the first one; an empty first page is a valid, empty result.
    /// The redirect target is the last page, or page one for an empty
    /// collection.
    #[must_use]
    pub fn resolve<T>(self, items: Vec<T>, total_count: u64) -> PageOutcome<T> {
        let pages = total_pages(total_count, self.page_size);
        if items.is_empty() && self.offset > 0 {
            return PageOutcome::Overflow {
                requested_page: self.page,
                target_page: pages.max(1),
            };
        }
        PageOutcome::Page(Page::new(
            items,
            self.page,
            self.page_size,
            total_count,
            pages,
        ))
    }
}
