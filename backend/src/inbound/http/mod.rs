//! HTTP inbound adapter exposing REST endpoints.

pub mod comments;
pub mod error;
pub mod feed;
pub mod health;
pub mod posts;
pub mod schemas;
pub mod session;
pub mod state;
pub mod subjects_dto;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod votes;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler and the extractor error handlers.
///
/// Mount inside a scope that carries the session middleware:
///
/// ```no_run
/// use actix_web::{App, web};
/// use social_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// # let _ = app;
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::get_user)
        .service(feed::list_posts)
        .service(posts::create_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(feed::list_comments)
        .service(comments::create_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment)
        .service(votes::vote_post)
        .service(votes::vote_comment);
}
