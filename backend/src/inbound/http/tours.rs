//! Tour handlers.
//!
//! ```text
//! GET /api/v1/tours
//! POST /api/v1/tours {"title":"Old town","country":"Italy","city":"Rome","price":"12.50",
//!                     "start_date":"2031-05-01","end_date":"2031-05-03","booking_means":"email"}
//! GET|PUT|DELETE /api/v1/tours/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ImageDescriptor, TourForm, TourId, TourView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::CurrentRequester;
use crate::inbound::http::schemas::{ErrorSchema, ImageDescriptorSchema, TourSchema};
use crate::inbound::http::state::HttpState;

/// Body for `POST /tours` and `PUT /tours/{id}`.
///
/// `price` may be a JSON number or a decimal string.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TourRequest {
    #[schema(example = "Old town at night")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "Italy")]
    pub country: Option<String>,
    #[schema(example = "Rome")]
    pub city: Option<String>,
    #[schema(value_type = Option<String>, example = "12.50")]
    pub price: Option<Value>,
    pub guide: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2031-05-01")]
    pub start_date: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2031-05-03")]
    pub end_date: Option<String>,
    #[schema(example = "email")]
    pub booking_means: Option<String>,
    #[schema(value_type = Option<ImageDescriptorSchema>)]
    pub image: Option<ImageDescriptor>,
}

fn price_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl From<TourRequest> for TourForm {
    fn from(value: TourRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            country: value.country,
            city: value.city,
            price: value.price.map(price_text),
            guide: value.guide,
            start_date: value.start_date,
            end_date: value.end_date,
            booking_means: value.booking_means,
            image: value.image,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tours",
    responses(
        (status = 200, description = "Tours, newest first", body = [TourSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "listTours"
)]
#[get("/tours")]
pub async fn list_tours(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
) -> ApiResult<web::Json<Vec<TourView>>> {
    state.tours.list(requester.get()).await.map(web::Json)
}

/// Publish a tour. Administrators only.
#[utoipa::path(
    post,
    path = "/api/v1/tours",
    request_body = TourRequest,
    responses(
        (status = 201, description = "Tour created", body = TourSchema),
        (status = 400, description = "Invalid tour", body = ErrorSchema),
        (status = 403, description = "Not an administrator", body = ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "createTour"
)]
#[post("/tours")]
pub async fn create_tour(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    payload: web::Json<TourRequest>,
) -> ApiResult<HttpResponse> {
    let view = state
        .tours
        .create(requester.get(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    get,
    path = "/api/v1/tours/{id}",
    params(("id" = i64, Path, description = "Tour id")),
    responses(
        (status = 200, description = "Tour", body = TourSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "getTour"
)]
#[get("/tours/{id}")]
pub async fn get_tour(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<TourId>,
) -> ApiResult<web::Json<TourView>> {
    state
        .tours
        .retrieve(requester.get(), id.into_inner())
        .await
        .map(web::Json)
}

#[utoipa::path(
    put,
    path = "/api/v1/tours/{id}",
    params(("id" = i64, Path, description = "Tour id")),
    request_body = TourRequest,
    responses(
        (status = 200, description = "Updated tour", body = TourSchema),
        (status = 400, description = "Invalid tour", body = ErrorSchema),
        (status = 403, description = "Neither creator nor administrator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "updateTour"
)]
#[put("/tours/{id}")]
pub async fn update_tour(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<TourId>,
    payload: web::Json<TourRequest>,
) -> ApiResult<web::Json<TourView>> {
    state
        .tours
        .update(requester.get(), id.into_inner(), payload.into_inner().into())
        .await
        .map(web::Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/tours/{id}",
    params(("id" = i64, Path, description = "Tour id")),
    responses(
        (status = 204, description = "Tour and its attendances deleted"),
        (status = 403, description = "Neither creator nor administrator", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tours"],
    operation_id = "deleteTour"
)]
#[delete("/tours/{id}")]
pub async fn delete_tour(
    state: web::Data<HttpState>,
    requester: CurrentRequester,
    id: web::Path<TourId>,
) -> ApiResult<HttpResponse> {
    state.tours.delete(requester.get(), id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
