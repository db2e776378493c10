//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::json;

use crate::Trace;
use crate::domain::Username;
use crate::inbound::http::api_routes;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// Password used by [`register`].
pub const TEST_PASSWORD: &str = "analytical";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Services backed by a fresh in-memory store and the system clock.
pub fn test_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        HttpStatePorts::from_store(Arc::new(InMemoryStore::new())),
        Arc::new(DefaultClock),
    ))
}

/// Initialise the `/api/v1` routes over a fresh store.
pub async fn init_api()
-> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    init_api_with(test_state()).await
}

/// Initialise the `/api/v1` routes over `state`.
pub async fn init_api_with(
    state: web::Data<HttpState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new().app_data(state).wrap(Trace).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(api_routes),
        ),
    )
    .await
}

/// The `session` cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Register `username` with [`TEST_PASSWORD`] and return its session cookie.
pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/registration")
            .set_json(json!({
                "username": username,
                "password1": TEST_PASSWORD,
                "password2": TEST_PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED, "registration of {username}");
    session_cookie(&res)
}

/// Log `username` in with [`TEST_PASSWORD`] and return its session cookie.
pub async fn login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": username, "password": TEST_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login of {username}");
    session_cookie(&res)
}

/// Bootstrap an administrator straight through the principal service.
pub async fn bootstrap_admin(state: &HttpState, username: &str) {
    let username = Username::new(username).expect("valid admin username");
    let created = state
        .principals
        .ensure_admin(username, TEST_PASSWORD)
        .await
        .expect("admin bootstrap");
    assert!(created, "admin already existed");
}

/// Attach `cookie` when present.
pub fn with_session(
    request: test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> test::TestRequest {
    match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    }
}
