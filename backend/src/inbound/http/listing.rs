//! `GET /listing-fields`: search, ordering and filter names per resource.

use actix_web::{get, web};

use crate::domain::{LISTING_FIELDS, ListingFields};
use crate::inbound::http::schemas::ListingFieldsSchema;

#[utoipa::path(
    get,
    path = "/api/v1/listing-fields",
    responses((status = 200, description = "Listing fields per resource", body = [ListingFieldsSchema])),
    tags = ["metadata"],
    operation_id = "listingFields",
    security([])
)]
#[get("/listing-fields")]
pub async fn listing_fields() -> web::Json<&'static [ListingFields]> {
    web::Json(LISTING_FIELDS)
}
