//! Page envelopes and listing outcomes.

use serde::Serialize;

/// Number of pages needed to hold `total_count` items, `ceil(total / size)`.
///
/// A zero page size yields zero pages rather than dividing by zero.
///
/// # Examples
///
/// ```
/// assert_eq!(pagination::total_pages(13, 4), 4);
/// assert_eq!(pagination::total_pages(12, 4), 3);
/// assert_eq!(pagination::total_pages(0, 4), 0);
/// ```
#[must_use]
pub const fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// One page of a listing together with the collection totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u64,
    page_size: u64,
    total_count: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    pub(crate) const fn new(
        items: Vec<T>,
        page: u64,
        page_size: u64,
        total_count: u64,
        total_pages: u64,
    ) -> Self {
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size the listing was cut with.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items in the whole collection.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages in the whole collection.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Transform every item while keeping the totals.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// Result of resolving a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    /// A renderable page, possibly empty when the collection is empty.
    Page(Page<T>),
    /// The requested page lies beyond the end of the collection; callers
    /// should redirect to `target_page` instead of rendering.
    Overflow {
        /// Page the caller asked for.
        requested_page: u64,
        /// Last page holding items (or `1` when the collection is empty).
        target_page: u64,
    },
}

impl<T> PageOutcome<T> {
    /// Return the page when the outcome is renderable.
    #[must_use]
    pub fn into_page(self) -> Option<Page<T>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Overflow { .. } => None,
        }
    }
}
