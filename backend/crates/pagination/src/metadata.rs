//! Pagination metadata returned alongside a page of items.

use serde::{Deserialize, Serialize};

use crate::request::PageRequest;

/// Metadata describing where a page sits within a listing.
///
/// Without a total, `has_next` is inferred from whether the window came back
/// full. [`Pagination::with_total`] replaces that estimate with the exact
/// answer and fills in `total` and `total_pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub per_page: u32,
    /// Number of items skipped before this page.
    pub offset: u64,
    /// Whether a previous page exists.
    pub has_prev: bool,
    /// Whether a further page exists.
    pub has_next: bool,
    /// Previous page number, if any.
    pub prev_page: Option<u32>,
    /// Next page number, if any.
    pub next_page: Option<u32>,
    /// Total number of items across all pages, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Total number of pages, when the total was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl Pagination {
    /// Describe a window that returned `item_count` items, without a total.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, Pagination};
    ///
    /// let full = Pagination::for_window(PageRequest::new(2, 10), 10);
    /// assert!(full.has_prev);
    /// assert!(full.has_next);
    /// assert_eq!(full.next_page, Some(3));
    ///
    /// let short = Pagination::for_window(PageRequest::new(2, 10), 4);
    /// assert!(!short.has_next);
    /// ```
    #[must_use]
    pub fn for_window(request: PageRequest, item_count: usize) -> Self {
        let page = request.page();
        let per_page = request.per_page();
        let has_prev = page > 1;
        let window_full = usize::try_from(per_page).is_ok_and(|size| item_count == size);
        Self {
            page,
            per_page,
            offset: request.offset(),
            has_prev,
            has_next: window_full,
            prev_page: has_prev.then(|| page - 1),
            next_page: next_page(page, window_full),
            total: None,
            total_pages: None,
        }
    }

    /// Attach the total item count and recompute `has_next` from it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, Pagination};
    ///
    /// let meta = Pagination::for_window(PageRequest::new(3, 20), 5).with_total(45);
    /// assert_eq!(meta.total_pages, Some(3));
    /// assert!(!meta.has_next);
    /// assert_eq!(meta.next_page, None);
    /// ```
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(self.per_page));
        let has_next = u64::from(self.page) < total_pages;
        self.total = Some(total);
        self.total_pages = Some(total_pages);
        self.has_next = has_next;
        self.next_page = next_page(self.page, has_next);
        self
    }

    /// The request window this metadata describes.
    #[must_use]
    pub fn request(&self) -> PageRequest {
        PageRequest::new(i64::from(self.page), i64::from(self.per_page))
    }
}

fn next_page(page: u32, has_next: bool) -> Option<u32> {
    if has_next { page.checked_add(1) } else { None }
}
