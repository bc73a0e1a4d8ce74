//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::Utc;
use serde_json::json;

use super::configure_api;
use super::state::HttpState;
use crate::domain::ports::UserRepository;
use crate::domain::{Role, User, UserId, Username};
use crate::outbound::memory::InMemoryStore;

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation and an insecure `session` cookie so the
/// test client can send it over plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `/api/v1` surface over `state`, as the server mounts it.
pub async fn api_service(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(configure_api),
        ),
    )
    .await
}

/// Store a member and return it.
pub async fn member(store: &InMemoryStore, username: &str, role: Role) -> User {
    let user = User::new(
        UserId::random(),
        Username::new(username).expect("fixture username"),
        role,
        Utc::now(),
    );
    store.upsert(&user).await.expect("store member");
    user
}

/// Log `user` in and return the session cookie.
pub async fn login<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "userId": user.as_ref() }))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
