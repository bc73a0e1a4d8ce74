//! Session and member lookup handlers.
//!
//! ```text
//! POST /api/v1/login {"userId":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}
//! GET /api/v1/users/me
//! GET /api/v1/users/{user_id}
//! ```
//!
//! Credential checks belong to an upstream identity provider; `login` only
//! binds an existing member to the session cookie.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{USER_ID, missing_field_error, parse_user_id};

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Member to bind to the session.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
}

/// A member profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Stable identifier.
    pub user_id: String,
    /// Unique handle.
    #[schema(example = "ada")]
    pub username: String,
    /// `regular`, `admin`, or `superuser`.
    #[schema(example = "regular")]
    pub role: String,
    /// Registration instant.
    pub created_at: DateTime<Utc>,
    /// Last profile change.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            user_id: value.id().to_string(),
            username: value.username().to_string(),
            role: value.role().as_str().to_owned(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Bind an existing member to the session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unknown member", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let raw = payload
        .into_inner()
        .user_id
        .ok_or_else(|| missing_field_error(USER_ID))?;
    let id = parse_user_id(&raw, USER_ID)?;
    let user = state
        .users
        .find_user(&id)
        .await?
        .ok_or_else(|| Error::unauthorized("unknown member"))?;
    session.persist_user(user.id())?;
    info!(user_id = %user.id(), "member logged in");
    Ok(web::Json(user.into()))
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The logged-in member.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current member", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let id = session.require_user_id()?;
    let user = state
        .users
        .find_user(&id)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    Ok(web::Json(user.into()))
}

/// A member by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Member", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let raw = path.into_inner();
    let id = parse_user_id(&raw, USER_ID)?;
    let user = state
        .users
        .find_user(&id)
        .await?
        .ok_or_else(|| Error::not_found(format!("User {id} not found")))?;
    Ok(web::Json(user.into()))
}
