//! Navigation links derived from pagination metadata.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::metadata::Pagination;

const PAGE_PARAM: &str = "page";
const PER_PAGE_PARAM: &str = "per_page";

/// Absolute URLs for navigating between pages.
///
/// Links keep every other query parameter of the base URL (sort order,
/// filters) and only rewrite `page` and `per_page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Link to the current page.
    #[serde(rename = "self")]
    pub self_: String,
    /// Link to the first page.
    pub first: String,
    /// Link to the previous page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Link to the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the last page, when the total is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl PageLinks {
    /// Build links for `pagination` relative to `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageLinks, PageRequest, Pagination};
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.test/posts?sort_by=id&page=9").expect("url");
    /// let meta = Pagination::for_window(PageRequest::new(2, 10), 10).with_total(25);
    /// let links = PageLinks::build(&base, &meta);
    ///
    /// assert_eq!(
    ///     links.next.as_deref(),
    ///     Some("https://example.test/posts?sort_by=id&page=3&per_page=10")
    /// );
    /// assert_eq!(links.last, links.next);
    /// ```
    #[must_use]
    pub fn build(base: &Url, pagination: &Pagination) -> Self {
        let per_page = pagination.per_page;
        let last = pagination
            .total_pages
            .map(|pages| pages.max(1))
            .and_then(|pages| u32::try_from(pages).ok())
            .map(|pages| page_url(base, pages, per_page));
        Self {
            self_: page_url(base, pagination.page, per_page),
            first: page_url(base, 1, per_page),
            prev: pagination
                .prev_page
                .map(|page| page_url(base, page, per_page)),
            next: pagination
                .next_page
                .map(|page| page_url(base, page, per_page)),
            last,
        }
    }
}

fn page_url(base: &Url, page: u32, per_page: u32) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM && key != PER_PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_PARAM, &page.to_string());
        pairs.append_pair(PER_PAGE_PARAM, &per_page.to_string());
    }
    url.into()
}
