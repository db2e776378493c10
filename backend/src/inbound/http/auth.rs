//! Registration, login and session handlers.
//!
//! ```text
//! POST /api/v1/auth/registration {"username":"ada","password1":"analytical","password2":"analytical"}
//! POST /api/v1/auth/login {"username":"ada","password":"analytical"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/user
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{
    CurrentUserView, Error, LoginCredentials, LoginValidationError, Principal, Registration,
    Requester,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::CurrentRequester;
use crate::inbound::http::schemas::{CurrentUserSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/auth/registration`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegistrationRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    pub password1: Option<String>,
    /// Must repeat `password1`.
    pub password2: Option<String>,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "username": ["This field may not be blank."] })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "password": ["This field may not be blank."] })),
    }
}

fn requester_for(principal: &Principal) -> Requester {
    Requester::Authenticated {
        id: principal.id,
        is_admin: principal.is_admin,
    }
}

/// Create an account with its profile and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/registration",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = CurrentUserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid or duplicate registration", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/registration")]
pub async fn registration(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let RegistrationRequest {
        username,
        password1,
        password2,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(
        username.as_deref(),
        password1.as_deref(),
        password2.as_deref(),
    )?;
    let principal = state.principals.register(registration).await?;
    session.persist_principal(principal.id)?;
    info!(principal = %principal.id, "registered principal");
    let user = state
        .principals
        .current_user(&requester_for(&principal))
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = CurrentUserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<CurrentUserView>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let principal = state.principals.login(&credentials).await?;
    session.persist_principal(principal.id)?;
    let user = state
        .principals
        .current_user(&requester_for(&principal))
        .await?;
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(json!({ "detail": "Successfully logged out." }))
}

/// Describe the signed-in principal.
#[utoipa::path(
    get,
    path = "/api/v1/auth/user",
    responses(
        (status = 200, description = "Current principal", body = CurrentUserSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
) -> ApiResult<web::Json<CurrentUserView>> {
    state
        .principals
        .current_user(requester.get())
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    use crate::inbound::http::test_utils::{init_api, register, session_cookie};

    #[actix_web::test]
    async fn registration_signs_the_new_principal_in() {
        let app = init_api().await;
        let cookie = register(&app, "ada").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/user")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["username"], "ada");
        assert_eq!(body["is_admin_user"], false);
        assert!(body["profile_id"].is_i64());
    }

    #[actix_web::test]
    async fn duplicate_username_is_rejected() {
        let app = init_api().await;
        register(&app, "ada").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/registration")
                .set_json(RegistrationRequest {
                    username: Some("ada".into()),
                    password1: Some("analytical".into()),
                    password2: Some("analytical".into()),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(RegistrationRequest::default(), "username")]
    #[case(
        RegistrationRequest {
            username: Some("ada".into()),
            password1: Some("short".into()),
            password2: Some("short".into()),
        },
        "password1"
    )]
    #[case(
        RegistrationRequest {
            username: Some("ada".into()),
            password1: Some("analytical".into()),
            password2: Some("engine".into()),
        },
        "non_field_errors"
    )]
    #[actix_web::test]
    async fn invalid_registration_reports_the_field(
        #[case] request: RegistrationRequest,
        #[case] field: &str,
    ) {
        let app = init_api().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/registration")
                .set_json(request)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert!(body["details"][field].is_array(), "details: {}", body["details"]);
    }

    #[rstest]
    #[case("analytical", StatusCode::OK)]
    #[case("wrong-password", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn login_checks_the_password(#[case] password: &str, #[case] expected: StatusCode) {
        let app = init_api().await;
        register(&app, "ada").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(LoginRequest {
                    username: "ada".into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn blank_login_fields_are_validation_errors() {
        let app = init_api().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(LoginRequest {
                    username: "  ".into(),
                    password: "analytical".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert!(body["details"]["username"].is_array());
    }

    #[actix_web::test]
    async fn logout_forgets_the_principal() {
        let app = init_api().await;
        let cookie = register(&app, "ada").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cleared = session_cookie(&res);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/user")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn anonymous_user_lookup_is_unauthorised() {
        let app = init_api().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/auth/user").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
