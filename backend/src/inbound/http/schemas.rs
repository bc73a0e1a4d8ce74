//! OpenAPI schema definitions for domain and pagination types.
//!
//! Domain types and the pagination crate stay framework-agnostic by not
//! deriving `ToSchema`. The wrappers here mirror their wire shape so utoipa
//! can document them from the inbound adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title is required")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`pagination::Pagination`].
#[derive(ToSchema)]
#[schema(as = pagination::Pagination)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginationSchema {
    /// One-based page number.
    #[schema(example = 1)]
    page: u32,
    /// Items per page after clamping.
    #[schema(example = 20)]
    per_page: u32,
    /// Items skipped before this page.
    #[schema(example = 0)]
    offset: u64,
    /// Whether an earlier page exists.
    has_prev: bool,
    /// Whether a later page exists.
    has_next: bool,
    /// Previous page number, when one exists.
    prev_page: Option<u32>,
    /// Next page number, when one exists.
    next_page: Option<u32>,
    /// Total items, when counted.
    total: Option<u64>,
    /// Total pages, when counted.
    total_pages: Option<u64>,
}

/// OpenAPI schema for [`pagination::PageLinks`].
#[derive(ToSchema)]
#[schema(as = pagination::PageLinks)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageLinksSchema {
    /// This page.
    #[serde(rename = "self")]
    #[schema(example = "http://localhost:8080/api/v1/posts?page=1&per_page=20")]
    self_: String,
    /// The first page.
    first: String,
    /// The previous page, when one exists.
    prev: Option<String>,
    /// The next page, when one exists.
    next: Option<String>,
    /// The last page, when the total is known.
    last: Option<String>,
}
