//! Offset pagination primitives shared by the backend feed endpoints.
//!
//! The crate is deliberately framework agnostic. It owns three concerns:
//!
//! - [`PageRequest`]: parsing and silent clamping of `page` / `per_page`
//!   inputs into a window with a computed offset.
//! - [`Pagination`]: the metadata block returned alongside a page of items,
//!   optionally enriched with a total count.
//! - [`Paginated`]: the `{ items, pagination }` envelope, plus
//!   [`PageLinks`] for building navigation URLs.
//!
//! # Example
//!
//! ```
//! use pagination::{PageRequest, Paginated, Pagination};
//!
//! let request = PageRequest::new(1, 20);
//! let items: Vec<u32> = (0..20).collect();
//! let pagination = Pagination::for_window(request, items.len()).with_total(45);
//! let page = Paginated::new(items, pagination);
//!
//! assert!(page.pagination.has_next);
//! assert_eq!(page.pagination.total_pages, Some(3));
//! ```

mod envelope;
mod error;
mod links;
mod metadata;
mod request;

pub use envelope::Paginated;
pub use error::PaginationError;
pub use links::PageLinks;
pub use metadata::Pagination;
pub use request::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PageRequest};
