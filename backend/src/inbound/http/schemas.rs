//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the JSON produced by their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema mirrors are used only for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Validation failures carry field-keyed message lists in `details`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Validation failed")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    #[schema(example = json!({"end_date": ["End date must be after start date"]}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ImageDescriptor`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ImageDescriptor)]
pub struct ImageDescriptorSchema {
    #[schema(example = "https://images.example.com/tours/rome.jpg")]
    url: String,
    #[schema(example = 180_000)]
    size_bytes: u64,
    #[schema(example = 1600)]
    width: u32,
    #[schema(example = 1200)]
    height: u32,
}

/// OpenAPI schema for [`crate::domain::CurrentUserView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CurrentUserView)]
pub struct CurrentUserSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "ada")]
    username: String,
    profile_id: i64,
    /// URL of the profile image.
    profile_image: Option<String>,
    is_admin_user: bool,
}

/// OpenAPI schema for [`crate::domain::ProfileView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ProfileView)]
pub struct ProfileSchema {
    id: i64,
    /// Username of the owning principal.
    owner: String,
    name: String,
    description: String,
    image: Option<ImageDescriptorSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    is_owner: bool,
    /// The requester's follow record for this profile's owner.
    following_id: Option<i64>,
    photos_count: u64,
    followers_count: u64,
    following_count: u64,
}

/// OpenAPI schema for [`crate::domain::PhotoView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PhotoView)]
pub struct PhotoSchema {
    id: i64,
    owner: String,
    is_owner: bool,
    profile_id: i64,
    /// URL of the owner's profile image.
    profile_image: Option<String>,
    title: String,
    description: String,
    camera_used: String,
    lense_used: String,
    image: Option<ImageDescriptorSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    /// The requester's like of this photo.
    like_id: Option<i64>,
    likes_count: u64,
    comments_count: u64,
}

/// OpenAPI schema for [`crate::domain::TourView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TourView)]
pub struct TourSchema {
    id: i64,
    owner: String,
    is_owner: bool,
    profile_id: i64,
    title: String,
    description: String,
    country: String,
    city: String,
    /// Decimal with two fractional digits.
    #[schema(example = "12.50")]
    price: String,
    guide: String,
    #[schema(value_type = String, format = Date)]
    start_date: String,
    #[schema(value_type = String, format = Date)]
    end_date: String,
    booking_means: String,
    image: Option<ImageDescriptorSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    /// The requester's attendance of this tour.
    attendance_id: Option<i64>,
    attendance_count: u64,
}

/// OpenAPI schema for [`crate::domain::CommentView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CommentView)]
pub struct CommentSchema {
    id: i64,
    owner: String,
    is_owner: bool,
    profile_id: i64,
    profile_image: Option<String>,
    photo: i64,
    content: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// A like as returned by `/likes`.
#[derive(ToSchema)]
#[schema(as = Like)]
pub struct LikeSchema {
    id: i64,
    owner: String,
    photo: i64,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// A follow as returned by `/followers`.
#[derive(ToSchema)]
#[schema(as = Follower)]
pub struct FollowerSchema {
    id: i64,
    owner: String,
    #[schema(value_type = String, format = Uuid)]
    followed: String,
    /// Username of the followed principal.
    followed_name: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// An attendance as returned by `/attendances`.
#[derive(ToSchema)]
#[schema(as = Attendance)]
pub struct AttendanceSchema {
    id: i64,
    owner: String,
    tour: i64,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ListingFields`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ListingFields)]
pub struct ListingFieldsSchema {
    #[schema(example = "photos")]
    resource: String,
    search: Vec<String>,
    ordering: Vec<String>,
    filter: Vec<String>,
}
