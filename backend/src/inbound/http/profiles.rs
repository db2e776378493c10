//! Profile handlers.
//!
//! Profiles are created with their principal at registration, so there is no
//! `POST`. Deleting a profile deletes the principal and everything it owns.

use actix_web::{HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ImageDescriptor, ProfileForm, ProfileId, ProfileView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::CurrentRequester;
use crate::inbound::http::schemas::{ErrorSchema, ImageDescriptorSchema, ProfileSchema};
use crate::inbound::http::state::HttpState;

/// Body for `PUT /profiles/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProfileRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<ImageDescriptorSchema>)]
    pub image: Option<ImageDescriptor>,
}

impl From<ProfileRequest> for ProfileForm {
    fn from(value: ProfileRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            image: value.image,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    responses(
        (status = 200, description = "Profiles, newest first", body = [ProfileSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "listProfiles"
)]
#[get("/profiles")]
pub async fn list_profiles(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
) -> ApiResult<web::Json<Vec<ProfileView>>> {
    state.profiles.list(requester.get()).await.map(web::Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile", body = ProfileSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profiles/{id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<ProfileId>,
) -> ApiResult<web::Json<ProfileView>> {
    state
        .profiles
        .retrieve(requester.get(), id.into_inner())
        .await
        .map(web::Json)
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}",
    params(("id" = i64, Path, description = "Profile id")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileSchema),
        (status = 400, description = "Invalid profile", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[put("/profiles/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<ProfileId>,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<ProfileView>> {
    state
        .profiles
        .update(requester.get(), id.into_inner(), payload.into_inner().into())
        .await
        .map(web::Json)
}

/// Delete a profile together with its principal.
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{id}",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 204, description = "Profile and principal deleted"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["profiles"],
    operation_id = "deleteProfile"
)]
#[delete("/profiles/{id}")]
pub async fn delete_profile(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<ProfileId>,
) -> ApiResult<HttpResponse> {
    state
        .profiles
        .delete(requester.get(), id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{TEST_PASSWORD, init_api, register};

    async fn profile_id<S>(app: &S, cookie: actix_web::cookie::Cookie<'static>) -> i64
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = test::call_service(
            app,
            test::TestRequest::get()
                .uri("/api/v1/auth/user")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        body["profile_id"].as_i64().expect("profile id")
    }

    #[actix_web::test]
    async fn owner_updates_profile_and_others_cannot() {
        let app = init_api().await;
        let ada = register(&app, "ada").await;
        let grace = register(&app, "grace").await;
        let uri = format!("/api/v1/profiles/{}", profile_id(&app, ada.clone()).await);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .cookie(grace)
                .set_json(json!({ "name": "Not Ada" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .cookie(ada)
                .set_json(json!({ "name": "Ada Lovelace", "description": "Analyst" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["name"], "Ada Lovelace");
        assert_eq!(body["owner"], "ada");
        assert_eq!(body["is_owner"], true);
    }

    #[actix_web::test]
    async fn deleting_a_profile_removes_the_principal() {
        let app = init_api().await;
        let ada = register(&app, "ada").await;
        let uri = format!("/api/v1/profiles/{}", profile_id(&app, ada.clone()).await);

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .cookie(ada.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({ "username": "ada", "password": TEST_PASSWORD }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/auth/user")
                .cookie(ada)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
