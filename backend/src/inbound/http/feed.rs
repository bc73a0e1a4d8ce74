//! Feed read handlers.
//!
//! ```text
//! GET /api/v1/posts?sort_by=created_at&order=desc&page=1&per_page=20
//! GET /api/v1/posts/{post_id}/comments?order=asc
//! ```
//!
//! Reads are public. A logged-in caller additionally sees their own vote on
//! every item through `user_vote`.

use actix_web::{HttpRequest, get, web};
use pagination::{PageRequest, PaginationError};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use utoipa::IntoParams;

use crate::domain::{Error, FeedQuery, SortField, SortOrder, SubjectKind, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::subjects_dto::{CommentFeedItem, FeedPage, PostFeedItem};
use crate::inbound::http::validation::post_id;

/// Query string accepted by the feed endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedParams {
    /// Sort field; `total_votes` and `user_vote` sort the fetched page only.
    #[param(example = "created_at")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
    /// Items per page, at most 100.
    pub per_page: Option<String>,
    /// Whether to count the whole listing (`true` by default).
    pub include_total: Option<String>,
}

impl FeedParams {
    fn into_query(
        self,
        kind: SubjectKind,
        default_order: SortOrder,
        voter: Option<UserId>,
    ) -> Result<FeedQuery, Error> {
        let sort = match self.sort_by.as_deref() {
            Some(raw) => SortField::parse(raw, kind)?,
            None => SortField::CreatedAt,
        };
        let order = match self.order.as_deref() {
            Some(raw) => raw.parse()?,
            None => default_order,
        };
        let page = PageRequest::parse(self.page.as_deref(), self.per_page.as_deref())
            .map_err(map_pagination_error)?;
        let include_total = parse_flag(self.include_total.as_deref())?;
        FeedQuery::new(sort, order, page, include_total, voter)
    }
}

fn map_pagination_error(error: PaginationError) -> Error {
    let field = error.field();
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn parse_flag(raw: Option<&str>) -> Result<bool, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") || value == "0" => Ok(false),
        Some(value) => Err(Error::invalid_request(format!(
            "include_total must be a boolean, got {value:?}"
        ))
        .with_details(json!({ "field": "include_total", "value": value }))),
    }
}

/// Absolute URL of the current request, the base for page links.
fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    Url::parse(&format!("{}://{}{}", info.scheme(), info.host(), req.uri()))
        .map_err(|err| Error::internal(format!("unrepresentable request url: {err}")))
}

/// One page of posts, each with its comments.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(FeedParams),
    responses(
        (status = 200, description = "A page of posts", body = FeedPage<PostFeedItem>),
        (status = 400, description = "Invalid sort, order, or page", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["feed"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<FeedParams>,
) -> ApiResult<web::Json<FeedPage<PostFeedItem>>> {
    let voter = session.user_id()?;
    let query = params
        .into_inner()
        .into_query(SubjectKind::Post, SortOrder::Desc, voter.clone())?;
    let page = state.feed.list_posts(query).await?;
    let base = request_url(&req)?;
    Ok(web::Json(FeedPage::from_page(page, &base, voter.as_ref())))
}

/// One page of a post's comments.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments",
    params(("post_id" = i64, Path, description = "Parent post"), FeedParams),
    responses(
        (status = 200, description = "A page of comments", body = FeedPage<CommentFeedItem>),
        (status = 400, description = "Invalid sort, order, or page", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["feed"],
    operation_id = "listComments",
    security([])
)]
#[get("/posts/{post_id}/comments")]
pub async fn list_comments(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    params: web::Query<FeedParams>,
) -> ApiResult<web::Json<FeedPage<CommentFeedItem>>> {
    let post = post_id(path.into_inner())?;
    let voter = session.user_id()?;
    let query = params
        .into_inner()
        .into_query(SubjectKind::Comment, SortOrder::Asc, voter.clone())?;
    let page = state.feed.list_comments(post, query).await?;
    let base = request_url(&req)?;
    Ok(web::Json(FeedPage::from_page(page, &base, voter.as_ref())))
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
