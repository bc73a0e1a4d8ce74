//! Post mutation handlers.
//!
//! ```text
//! POST   /api/v1/posts {"title":"..","content":"..","temp_id":".."}
//! PUT    /api/v1/posts/{post_id} {"title":".."}
//! DELETE /api/v1/posts/{post_id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, NewPostDraft, PostPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::subjects_dto::{
    CreatePostRequest, PostCreatedResponse, PostDeletedResponse, PostDto, UpdatePostRequest,
};
use crate::inbound::http::validation::{CONTENT, TITLE, post_id, required_text, required_token};

const POST_CREATED: &str = "Post Created Successfully";
const POST_MISSING: &str = "Post not found or unauthorized";

fn post_missing(id: i64) -> Error {
    Error::not_found(POST_MISSING).with_details(json!({ "postId": id }))
}

/// Create a post.
///
/// Repeating the request with the same `temp_id` answers `200` with the
/// stored post instead of creating a duplicate.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostCreatedResponse),
        (status = 200, description = "Replayed creation", body = PostCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.users.as_ref()).await?;
    let CreatePostRequest {
        title,
        content,
        temp_id,
    } = payload.into_inner();
    let draft = NewPostDraft::new(
        required_text(title, TITLE)?,
        required_text(content, CONTENT)?,
        required_token(temp_id)?,
    )?;
    let created = state.posts.create_post(&actor, draft).await?;
    if created.replayed {
        debug!(post_id = created.subject.id.get(), "replayed post creation");
    }
    let body = PostCreatedResponse {
        message: POST_CREATED.to_owned(),
        post: created.subject.into(),
    };
    Ok(if created.replayed {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::Created().json(body)
    })
}

/// Update a post's title or content. Only its author may do so.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}",
    params(("post_id" = i64, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised or not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{post_id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostDto>> {
    let raw = path.into_inner();
    let id = post_id(raw)?;
    let actor = session.require_actor(state.users.as_ref()).await?;
    let UpdatePostRequest { title, content } = payload.into_inner();
    let patch = PostPatch::new(title, content)?;
    let post = state
        .posts
        .update_post(&actor, id, patch)
        .await?
        .ok_or_else(|| post_missing(raw))?;
    Ok(web::Json(post.into()))
}

/// Delete a post with its comments and votes. Its author or a superuser
/// may do so.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}",
    params(("post_id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Deleted post", body = PostDeletedResponse),
        (status = 401, description = "Unauthorised or not permitted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{post_id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostDeletedResponse>> {
    let raw = path.into_inner();
    let id = post_id(raw)?;
    let actor = session.require_actor(state.users.as_ref()).await?;
    let deleted = state
        .posts
        .delete_post(&actor, id)
        .await?
        .ok_or_else(|| post_missing(raw))?;
    Ok(web::Json(PostDeletedResponse {
        message: deleted.message.to_owned(),
        post_id: raw,
        post: deleted.subject.into(),
    }))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
