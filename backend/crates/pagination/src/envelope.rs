//! `{ items, pagination }` response envelope.

use serde::{Deserialize, Serialize};

use crate::metadata::Pagination;

/// A page of items together with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items in this page, in presentation order.
    pub items: Vec<T>,
    /// Metadata describing the page window.
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Wrap a page of items.
    #[must_use]
    pub const fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Transform every item while keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, Paginated, Pagination};
    ///
    /// let page = Paginated::new(
    ///     vec![1, 2],
    ///     Pagination::for_window(PageRequest::default(), 2),
    /// );
    /// let doubled = page.map(|n| n * 2);
    /// assert_eq!(doubled.items, vec![2, 4]);
    /// ```
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Number of items in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
