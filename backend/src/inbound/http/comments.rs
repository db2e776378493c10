//! Comment handlers.
//!
//! ```text
//! GET /api/v1/comments?photo=3
//! POST /api/v1/comments {"photo":3,"content":"Lovely light"}
//! GET|PUT|DELETE /api/v1/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{CommentId, CommentView, Error, FieldErrors, PhotoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::CurrentRequester;
use crate::inbound::http::schemas::{CommentSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Body for `POST /comments`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CommentRequest {
    #[schema(value_type = Option<i64>)]
    pub photo: Option<PhotoId>,
    #[schema(example = "Lovely light")]
    pub content: Option<String>,
}

/// Body for `PUT /comments/{id}`. A `photo` field is ignored.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CommentUpdateRequest {
    pub content: Option<String>,
}

/// Query string for `GET /comments`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct CommentFilter {
    /// Only comments on this photo.
    pub photo: Option<String>,
}

impl CommentFilter {
    fn photo(&self) -> Result<Option<PhotoId>, Error> {
        let Some(raw) = self.photo.as_deref().filter(|raw| !raw.trim().is_empty()) else {
            return Ok(None);
        };
        raw.parse::<PhotoId>().map(Some).map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.push("photo", "Enter a number.");
            Error::from(errors)
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/comments",
    params(CommentFilter),
    responses(
        (status = 200, description = "Comments, newest first", body = [CommentSchema]),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    filter: web::Query<CommentFilter>,
) -> ApiResult<web::Json<Vec<CommentView>>> {
    let photo = filter.photo()?;
    state
        .comments
        .list(requester.get(), photo)
        .await
        .map(web::Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentSchema),
        (status = 400, description = "Invalid comment or unknown photo", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let CommentRequest { photo, content } = payload.into_inner();
    let view = state
        .comments
        .create(requester.get(), photo, content)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    get,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment", body = CommentSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/comments/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<CommentId>,
) -> ApiResult<web::Json<CommentView>> {
    state
        .comments
        .retrieve(requester.get(), id.into_inner())
        .await
        .map(web::Json)
}

#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentSchema),
        (status = 400, description = "Invalid comment", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<CommentId>,
    payload: web::Json<CommentUpdateRequest>,
) -> ApiResult<web::Json<CommentView>> {
    state
        .comments
        .update(requester.get(), id.into_inner(), payload.into_inner().content)
        .await
        .map(web::Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<CommentId>,
) -> ApiResult<HttpResponse> {
    state
        .comments
        .delete(requester.get(), id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{init_api, register};

    #[rstest]
    #[case(Some("7"), Ok(Some(PhotoId::new(7))))]
    #[case(Some(""), Ok(None))]
    #[case(None, Ok(None))]
    #[case(Some("seven"), Err(()))]
    fn photo_filter_parses_ids(
        #[case] raw: Option<&str>,
        #[case] expected: Result<Option<PhotoId>, ()>,
    ) {
        let filter = CommentFilter {
            photo: raw.map(str::to_owned),
        };
        assert_eq!(filter.photo().map_err(|_| ()), expected);
    }

    #[actix_web::test]
    async fn comments_filter_by_photo() {
        let app = init_api().await;
        let ada = register(&app, "ada").await;
        let mut photos = Vec::new();
        for title in ["Harbour", "Bridge"] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/photos")
                    .cookie(ada.clone())
                    .set_json(json!({ "title": title }))
                    .to_request(),
            )
            .await;
            let body: Value = actix_test::read_body_json(res).await;
            photos.push(body["id"].as_i64().expect("photo id"));
        }
        for photo in &photos {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/comments")
                    .cookie(ada.clone())
                    .set_json(json!({ "photo": photo, "content": "Lovely light" }))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/comments?photo={}", photos[0]))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        let listed = body.as_array().expect("array");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["photo"], photos[0]);
        assert_eq!(listed[0]["is_owner"], false);
    }

    #[actix_web::test]
    async fn commenting_on_a_missing_photo_is_a_field_error() {
        let app = init_api().await;
        let ada = register(&app, "ada").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/comments")
                .cookie(ada)
                .set_json(json!({ "photo": 999, "content": "Hello" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert!(body["details"]["photo"].is_array());
    }

    #[actix_web::test]
    async fn anonymous_comment_is_forbidden() {
        let app = init_api().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/comments")
                .set_json(json!({ "photo": 1, "content": "Hello" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
