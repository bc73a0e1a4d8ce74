//! Page window requests with silent clamping.

use serde::{Deserialize, Serialize};

use crate::error::PaginationError;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// A validated page window.
///
/// Construction never fails for out-of-range numbers: `page` below one is
/// raised to one and `per_page` is clamped into `1..=MAX_PER_PAGE`.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(0, 500);
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.per_page(), 100);
/// assert_eq!(request.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a window from raw numbers, clamping both values.
    #[must_use]
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
        let per_page =
            u32::try_from(per_page.clamp(1, i64::from(MAX_PER_PAGE))).unwrap_or(MAX_PER_PAGE);
        Self { page, per_page }
    }

    /// Parse optional textual inputs, as received from a query string.
    ///
    /// Absent or blank values fall back to page one and
    /// [`DEFAULT_PER_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::NotAnInteger`] when a present value is not
    /// an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::parse(Some("3"), None).expect("valid input");
    /// assert_eq!(request.page(), 3);
    /// assert_eq!(request.per_page(), 20);
    /// assert!(PageRequest::parse(Some("three"), None).is_err());
    /// ```
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Result<Self, PaginationError> {
        let page = parse_field("page", page)?.unwrap_or(1);
        let per_page = parse_field("per_page", per_page)?.unwrap_or(i64::from(DEFAULT_PER_PAGE));
        Ok(Self::new(page, per_page))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items skipped before this window.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Return the same window size positioned on another page.
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: self.per_page,
        }
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, PaginationError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| PaginationError::NotAnInteger {
            field,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 20, 1, 20)]
    #[case(0, 20, 1, 20)]
    #[case(-4, 20, 1, 20)]
    #[case(2, 0, 2, 1)]
    #[case(2, -10, 2, 1)]
    #[case(3, 101, 3, 100)]
    #[case(i64::MAX, 10, u32::MAX, 10)]
    fn new_clamps_inputs(
        #[case] page: i64,
        #[case] per_page: i64,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let request = PageRequest::new(page, per_page);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.per_page(), expected_per_page);
    }

    #[rstest]
    #[case(1, 20, 0)]
    #[case(2, 20, 20)]
    #[case(3, 15, 30)]
    fn offset_skips_previous_pages(#[case] page: i64, #[case] per_page: i64, #[case] offset: u64) {
        assert_eq!(PageRequest::new(page, per_page).offset(), offset);
    }

    #[test]
    fn offset_does_not_overflow_on_extreme_pages() {
        let request = PageRequest::new(i64::MAX, i64::from(MAX_PER_PAGE));
        assert_eq!(
            request.offset(),
            u64::from(u32::MAX - 1) * u64::from(MAX_PER_PAGE)
        );
    }

    #[test]
    fn parse_uses_defaults_for_missing_and_blank_values() {
        let request = PageRequest::parse(None, Some("  ")).expect("defaults apply");
        assert_eq!(request, PageRequest::default());
    }

    #[rstest]
    #[case(Some("x"), None, "page")]
    #[case(None, Some("2.5"), "per_page")]
    fn parse_rejects_non_integers(
        #[case] page: Option<&str>,
        #[case] per_page: Option<&str>,
        #[case] field: &str,
    ) {
        let err = PageRequest::parse(page, per_page).expect_err("non-integer input");
        assert_eq!(err.field(), field);
    }

    #[test]
    fn with_page_keeps_window_size() {
        let request = PageRequest::new(4, 15).with_page(0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 15);
    }
}
