//! Photo handlers.
//!
//! ```text
//! GET /api/v1/photos
//! POST /api/v1/photos {"title":"Harbour at dusk","camera_used":"X100V"}
//! GET|PUT|DELETE /api/v1/photos/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ImageDescriptor, PhotoForm, PhotoId, PhotoView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::CurrentRequester;
use crate::inbound::http::schemas::{ErrorSchema, ImageDescriptorSchema, PhotoSchema};
use crate::inbound::http::state::HttpState;

/// Body for `POST /photos` and `PUT /photos/{id}`.
///
/// Omitted optional fields fall back to their defaults on both create and
/// update.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PhotoRequest {
    #[schema(example = "Harbour at dusk")]
    pub title: Option<String>,
    pub description: Option<String>,
    pub camera_used: Option<String>,
    pub lense_used: Option<String>,
    #[schema(value_type = Option<ImageDescriptorSchema>)]
    pub image: Option<ImageDescriptor>,
}

impl From<PhotoRequest> for PhotoForm {
    fn from(value: PhotoRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            camera_used: value.camera_used,
            lense_used: value.lense_used,
            image: value.image,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/photos",
    responses(
        (status = 200, description = "Photos, newest first", body = [PhotoSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "listPhotos"
)]
#[get("/photos")]
pub async fn list_photos(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
) -> ApiResult<web::Json<Vec<PhotoView>>> {
    state.photos.list(requester.get()).await.map(web::Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/photos",
    request_body = PhotoRequest,
    responses(
        (status = 201, description = "Photo created", body = PhotoSchema),
        (status = 400, description = "Invalid photo", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "createPhoto"
)]
#[post("/photos")]
pub async fn create_photo(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    payload: web::Json<PhotoRequest>,
) -> ApiResult<HttpResponse> {
    let view = state
        .photos
        .create(requester.get(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    get,
    path = "/api/v1/photos/{id}",
    params(("id" = i64, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo", body = PhotoSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "getPhoto"
)]
#[get("/photos/{id}")]
pub async fn get_photo(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<PhotoId>,
) -> ApiResult<web::Json<PhotoView>> {
    state
        .photos
        .retrieve(requester.get(), id.into_inner())
        .await
        .map(web::Json)
}

/// Replace a photo's fields. Only the owner may do this.
#[utoipa::path(
    put,
    path = "/api/v1/photos/{id}",
    params(("id" = i64, Path, description = "Photo id")),
    request_body = PhotoRequest,
    responses(
        (status = 200, description = "Updated photo", body = PhotoSchema),
        (status = 400, description = "Invalid photo", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "updatePhoto"
)]
#[put("/photos/{id}")]
pub async fn update_photo(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<PhotoId>,
    payload: web::Json<PhotoRequest>,
) -> ApiResult<web::Json<PhotoView>> {
    state
        .photos
        .update(requester.get(), id.into_inner(), payload.into_inner().into())
        .await
        .map(web::Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/photos/{id}",
    params(("id" = i64, Path, description = "Photo id")),
    responses(
        (status = 204, description = "Photo, its comments and likes deleted"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "deletePhoto"
)]
#[delete("/photos/{id}")]
pub async fn delete_photo(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<PhotoId>,
) -> ApiResult<HttpResponse> {
    state.photos.delete(requester.get(), id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{init_api, register, with_session};

    #[actix_web::test]
    async fn owner_creates_and_edits_a_photo() {
        let app = init_api().await;
        let ada = register(&app, "ada").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/photos")
                .cookie(ada.clone())
                .set_json(json!({ "title": "Harbour", "camera_used": "X100V", "likes_count": 99 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(res).await;
        assert_eq!(created["owner"], "ada");
        assert_eq!(created["is_owner"], true);
        assert_eq!(created["likes_count"], 0);
        let id = created["id"].as_i64().expect("photo id");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/photos/{id}"))
                .cookie(ada)
                .set_json(json!({ "title": "Harbour at dusk" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = actix_test::read_body_json(res).await;
        assert_eq!(updated["title"], "Harbour at dusk");
        assert_ne!(updated["camera_used"], "X100V");
    }

    #[rstest]
    #[case(None, StatusCode::FORBIDDEN)]
    #[case(Some("grace"), StatusCode::FORBIDDEN)]
    #[case(Some("ada"), StatusCode::NO_CONTENT)]
    #[actix_web::test]
    async fn only_the_owner_deletes(#[case] actor: Option<&str>, #[case] expected: StatusCode) {
        let app = init_api().await;
        let ada = register(&app, "ada").await;
        let grace = register(&app, "grace").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/photos")
                .cookie(ada.clone())
                .set_json(PhotoRequest {
                    title: Some("Harbour".into()),
                    ..PhotoRequest::default()
                })
                .to_request(),
        )
        .await;
        let created: Value = actix_test::read_body_json(res).await;
        let uri = format!("/api/v1/photos/{}", created["id"]);

        let cookie = match actor {
            Some("ada") => Some(&ada),
            Some(_) => Some(&grace),
            None => None,
        };
        let res = actix_test::call_service(
            &app,
            with_session(actix_test::TestRequest::delete().uri(&uri), cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request()).await;
        let still_there = expected != StatusCode::NO_CONTENT;
        assert_eq!(res.status().is_success(), still_there);
    }

    #[actix_web::test]
    async fn oversized_image_is_a_field_error() {
        let app = init_api().await;
        let ada = register(&app, "ada").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/photos")
                .cookie(ada)
                .set_json(json!({
                    "title": "Huge",
                    "image": { "url": "huge.png", "size_bytes": 5_000_000, "width": 10, "height": 10 }
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["image"][0], "Image size larger than 2MB!");
    }

    #[actix_web::test]
    async fn unknown_photo_is_not_found() {
        let app = init_api().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/photos/404").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
