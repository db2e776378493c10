//! Shared helpers for the HTTP integration suites.
//!
//! Each suite compiles as its own crate, so the app wiring and the JSON
//! request helpers live here rather than in the library's test utilities.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use tourlens::Trace;
use tourlens::domain::Username;
use tourlens::inbound::http::api_routes;
use tourlens::inbound::http::state::{HttpState, HttpStatePorts};
use tourlens::outbound::memory::InMemoryStore;

pub const PASSWORD: &str = "analytical";

/// Services over a fresh in-memory store.
pub fn fresh_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        HttpStatePorts::from_store(Arc::new(InMemoryStore::new())),
        Arc::new(DefaultClock),
    ))
}

/// The API mounted the way the server mounts it, minus the `Secure` flag.
pub async fn init_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new().app_data(state).wrap(Trace).service(
            web::scope("/api/v1")
                .wrap(session)
                .configure(api_routes),
        ),
    )
    .await
}

/// Issue a JSON request and decode the body; empty bodies decode to `null`.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: Method,
    uri: &str,
    session: Option<&Cookie<'static>>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = test::TestRequest::default().method(method).uri(uri);
    if let Some(cookie) = session {
        request = request.cookie(cookie.clone());
    }
    if let Some(body) = body {
        request = request.set_json(body);
    }
    decode(test::call_service(app, request.to_request()).await).await
}

/// Issue a request with a verbatim body and optional content type.
pub async fn send_raw(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: Method,
    uri: &str,
    session: Option<&Cookie<'static>>,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut request = test::TestRequest::default()
        .method(method)
        .uri(uri)
        .set_payload(body);
    if let Some(content_type) = content_type {
        request = request.insert_header((header::CONTENT_TYPE, content_type.to_owned()));
    }
    if let Some(cookie) = session {
        request = request.cookie(cookie.clone());
    }
    decode(test::call_service(app, request.to_request()).await).await
}

async fn decode(res: ServiceResponse) -> (StatusCode, Value) {
    let status = res.status();
    let bytes = test::read_body(res).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, value)
}

pub async fn get(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    session: Option<&Cookie<'static>>,
) -> (StatusCode, Value) {
    send(app, Method::GET, uri, session, None).await
}

fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Register `username` with [`PASSWORD`] and return the session cookie.
pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/registration")
            .set_json(json!({
                "username": username,
                "password1": PASSWORD,
                "password2": PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED, "registering {username}");
    session_cookie(&res).expect("registration sets a session")
}

/// Attempt a login, returning the status and any session cookie.
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> (StatusCode, Option<Cookie<'static>>) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    (res.status(), session_cookie(&res))
}

/// Create an administrator directly through the principal service.
pub async fn bootstrap_admin(state: &HttpState, username: &str) {
    let username = Username::new(username).expect("valid username");
    state
        .principals
        .ensure_admin(username, PASSWORD)
        .await
        .expect("administrator bootstrap");
}

/// Publish a photo as `session` and return its id.
pub async fn create_photo(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    session: &Cookie<'static>,
    title: &str,
) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/photos",
        Some(session),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "photo creation: {body}");
    body["id"].as_i64().expect("photo id")
}

/// Extract an integer id field.
pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("numeric id")
}
