//! Page-number pagination primitives shared by catalogue listings.
//!
//! A [`PageRequest`] validates the caller's page number and page size and
//! derives the offset window handed to the data store. Once the window has
//! been read, [`PageRequest::resolve`] turns the fetched items and the total
//! count into a [`PageOutcome`]: either a renderable [`Page`] or an
//! [`PageOutcome::Overflow`] signal telling the caller to redirect to the
//! last available page.
//!
//! ```
//! use pagination::{PageOutcome, PageRequest};
//!
//! let request = PageRequest::new(9, 4).expect("valid request");
//! let outcome = request.resolve(Vec::<u8>::new(), 13);
//! assert_eq!(outcome, PageOutcome::Overflow { requested_page: 9, target_page: 4 });
//! ```

mod envelope;
mod error;
mod request;

pub use envelope::{Page, PageOutcome, total_pages};
pub use error::PaginationError;
pub use request::{DEFAULT_PAGE_SIZE, PageRequest};
