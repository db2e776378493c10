//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! schema mirrors from [`crate::inbound::http::schemas`] and the session
//! cookie security scheme. Swagger UI serves it in debug builds.

use crate::inbound::http::auth::{LoginRequest, RegistrationRequest};
use crate::inbound::http::comments::{CommentRequest, CommentUpdateRequest};
use crate::inbound::http::photos::PhotoRequest;
use crate::inbound::http::profiles::ProfileRequest;
use crate::inbound::http::relationships::{AttendanceRequest, FollowerRequest, LikeRequest};
use crate::inbound::http::schemas::{
    AttendanceSchema, CommentSchema, CurrentUserSchema, ErrorCodeSchema, ErrorSchema,
    FollowerSchema, ImageDescriptorSchema, LikeSchema, ListingFieldsSchema, PhotoSchema,
    ProfileSchema, TourSchema,
};
use crate::inbound::http::tours::TourRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/registration.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tourlens backend API",
        description = "Profiles, photos, tours and the comments, likes, follows and attendances around them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::registration,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::profiles::list_profiles,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::profiles::delete_profile,
        crate::inbound::http::photos::list_photos,
        crate::inbound::http::photos::create_photo,
        crate::inbound::http::photos::get_photo,
        crate::inbound::http::photos::update_photo,
        crate::inbound::http::photos::delete_photo,
        crate::inbound::http::tours::list_tours,
        crate::inbound::http::tours::create_tour,
        crate::inbound::http::tours::get_tour,
        crate::inbound::http::tours::update_tour,
        crate::inbound::http::tours::delete_tour,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::relationships::list_likes,
        crate::inbound::http::relationships::create_like,
        crate::inbound::http::relationships::get_like,
        crate::inbound::http::relationships::delete_like,
        crate::inbound::http::relationships::list_followers,
        crate::inbound::http::relationships::create_follower,
        crate::inbound::http::relationships::get_follower,
        crate::inbound::http::relationships::delete_follower,
        crate::inbound::http::relationships::list_attendances,
        crate::inbound::http::relationships::create_attendance,
        crate::inbound::http::relationships::get_attendance,
        crate::inbound::http::relationships::delete_attendance,
        crate::inbound::http::listing::listing_fields,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ImageDescriptorSchema,
        CurrentUserSchema,
        ProfileSchema,
        PhotoSchema,
        TourSchema,
        CommentSchema,
        LikeSchema,
        FollowerSchema,
        AttendanceSchema,
        ListingFieldsSchema,
        RegistrationRequest,
        LoginRequest,
        ProfileRequest,
        PhotoRequest,
        TourRequest,
        CommentRequest,
        CommentUpdateRequest,
        LikeRequest,
        FollowerRequest,
        AttendanceRequest,
    )),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "profiles", description = "One profile per principal"),
        (name = "photos", description = "Photos and their counts"),
        (name = "tours", description = "Tours published by administrators"),
        (name = "comments", description = "Comments on photos"),
        (name = "likes", description = "Principals liking photos"),
        (name = "followers", description = "Principals following principals"),
        (name = "attendances", description = "Principals attending tours"),
        (name = "metadata", description = "Listing metadata"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
