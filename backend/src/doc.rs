//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` endpoint, the health probes, the
//! schema wrappers from [`crate::inbound::http::schemas`], and the session
//! cookie security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, PageLinksSchema, PaginationSchema,
};
use crate::inbound::http::subjects_dto::{
    AuthorDto, CommentCreatedResponse, CommentDeletedResponse, CommentDto, CommentFeedItem,
    CreateCommentRequest, CreatePostRequest, PostCreatedResponse, PostDeletedResponse, PostDto,
    PostFeedItem, UpdateCommentRequest, UpdatePostRequest, VoteBody, VoteResultDto,
};
use crate::inbound::http::users::{LoginRequest, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Social backend API",
        description = "Posts, comments, and votes with paginated feeds and author-owned mutations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::feed::list_posts,
        crate::inbound::http::feed::list_comments,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::votes::vote_post,
        crate::inbound::http::votes::vote_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PaginationSchema,
        PageLinksSchema,
        LoginRequest,
        UserResponse,
        AuthorDto,
        PostDto,
        CommentDto,
        PostFeedItem,
        CommentFeedItem,
        CreatePostRequest,
        CreateCommentRequest,
        UpdatePostRequest,
        UpdateCommentRequest,
        PostCreatedResponse,
        CommentCreatedResponse,
        PostDeletedResponse,
        CommentDeletedResponse,
        VoteBody,
        VoteResultDto,
    )),
    tags(
        (name = "users", description = "Session login and member lookup"),
        (name = "feed", description = "Paginated post and comment listings"),
        (name = "posts", description = "Author-owned post mutations"),
        (name = "comments", description = "Author-owned comment mutations"),
        (name = "votes", description = "Up and down votes with toggle semantics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
