//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod comments;
pub mod error;
pub mod health;
pub mod listing;
pub mod photos;
pub mod profiles;
pub mod relationships;
pub mod requester;
pub mod schemas;
pub mod session;
pub mod state;
pub mod tours;
pub mod write_gate;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Register every `/api/v1` route on `cfg`.
///
/// The caller supplies the scope, the session middleware and the
/// [`state::HttpState`] app data. Authentication routes sit outside the
/// [`write_gate::WriteGate`]; every resource route sits behind it.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use tourlens::inbound::http::api_routes;
///
/// let app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(auth::registration)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(
            web::scope("")
                .wrap(write_gate::WriteGate)
                .service(profiles::list_profiles)
                .service(profiles::get_profile)
                .service(profiles::update_profile)
                .service(profiles::delete_profile)
                .service(photos::list_photos)
                .service(photos::create_photo)
                .service(photos::get_photo)
                .service(photos::update_photo)
                .service(photos::delete_photo)
                .service(tours::list_tours)
                .service(tours::create_tour)
                .service(tours::get_tour)
                .service(tours::update_tour)
                .service(tours::delete_tour)
                .service(comments::list_comments)
                .service(comments::create_comment)
                .service(comments::get_comment)
                .service(comments::update_comment)
                .service(comments::delete_comment)
                .service(relationships::list_likes)
                .service(relationships::create_like)
                .service(relationships::get_like)
                .service(relationships::delete_like)
                .service(relationships::list_followers)
                .service(relationships::create_follower)
                .service(relationships::get_follower)
                .service(relationships::delete_follower)
                .service(relationships::list_attendances)
                .service(relationships::create_attendance)
                .service(relationships::get_attendance)
                .service(relationships::delete_attendance)
                .service(listing::listing_fields),
        );
}
