//! Comment mutation handlers.
//!
//! ```text
//! POST   /api/v1/posts/{post_id}/comments {"content":"..","temp_id":".."}
//! PUT    /api/v1/comments/{comment_id} {"content":".."}
//! DELETE /api/v1/comments/{comment_id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use serde_json::json;

use crate::domain::{CommentPatch, Error, NewCommentDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::subjects_dto::{
    CommentCreatedResponse, CommentDeletedResponse, CommentDto, CreateCommentRequest,
    UpdateCommentRequest,
};
use crate::inbound::http::validation::{CONTENT, comment_id, post_id, required_text, required_token};

const COMMENT_CREATED: &str = "Comment Created Successfully";

fn comment_missing(id: i64) -> Error {
    Error::not_found("Comment not found or unauthorized").with_details(json!({ "commentId": id }))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments",
    params(("post_id" = i64, Path, description = "Parent post")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentCreatedResponse),
        (status = 200, description = "Replayed creation", body = CommentCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/posts/{post_id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let post = post_id(path.into_inner())?;
    let actor = session.require_actor(state.users.as_ref()).await?;
    let CreateCommentRequest { content, temp_id } = payload.into_inner();
    let draft = NewCommentDraft::new(required_text(content, CONTENT)?, required_token(temp_id)?)?;
    let created = state.comments.create_comment(&actor, post, draft).await?;
    let body = CommentCreatedResponse {
        message: COMMENT_CREATED.to_owned(),
        comment: created.subject.into(),
    };
    Ok(if created.replayed {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::Created().json(body)
    })
}

/// Update a comment's content. Only its author may do so.
#[utoipa::path(
    put,
    path = "/api/v1/comments/{comment_id}",
    params(("comment_id" = i64, Path, description = "Comment identifier")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised or not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/comments/{comment_id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<CommentDto>> {
    let raw = path.into_inner();
    let id = comment_id(raw)?;
    let actor = session.require_actor(state.users.as_ref()).await?;
    let patch = CommentPatch::new(payload.into_inner().content)?;
    let comment = state
        .comments
        .update_comment(&actor, id, patch)
        .await?
        .ok_or_else(|| comment_missing(raw))?;
    Ok(web::Json(comment.into()))
}

/// Delete a comment and its votes. Its author or a superuser may do so.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{comment_id}",
    params(("comment_id" = i64, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Deleted comment", body = CommentDeletedResponse),
        (status = 401, description = "Unauthorised or not permitted", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CommentDeletedResponse>> {
    let raw = path.into_inner();
    let id = comment_id(raw)?;
    let actor = session.require_actor(state.users.as_ref()).await?;
    let deleted = state
        .comments
        .delete_comment(&actor, id)
        .await?
        .ok_or_else(|| comment_missing(raw))?;
    Ok(web::Json(CommentDeletedResponse {
        message: deleted.message.to_owned(),
        comment_id: raw,
        comment: deleted.subject.into(),
    }))
}

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;
