//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, SessionCookie};
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use tourlens::Trace;
#[cfg(debug_assertions)]
use tourlens::doc::ApiDoc;
use tourlens::inbound::http::api_routes;
use tourlens::inbound::http::health::{HealthState, live, ready};
use tourlens::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionCookie,
}

/// The full application: `/api/v1` behind the session cookie, the health
/// probes outside it and, in debug builds, Swagger UI at `/docs`.
fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session.middleware())
        .configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Bind `config.bind_addr` and start serving; readiness flips once bound.
///
/// # Errors
/// Fails when the address cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        session: config.session,
    };
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::cookie::{Key, SameSite};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockable::DefaultClock;
    use rstest::rstest;
    use serde_json::json;
    use tourlens::inbound::http::state::HttpStatePorts;
    use tourlens::outbound::memory::InMemoryStore;

    fn deps(secure: bool) -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(HttpState::new(
                HttpStatePorts::from_store(Arc::new(InMemoryStore::new())),
                Arc::new(DefaultClock),
            )),
            session: SessionCookie::new(Key::generate(), secure),
        }
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[actix_rt::test]
    async fn session_cookie_is_private_and_scoped(#[case] secure: bool) {
        let app = actix_test::init_service(build_app(deps(secure))).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/registration")
                .set_json(json!({
                    "username": "ada",
                    "password1": "analytical",
                    "password2": "analytical",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(secure));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_some());
        assert!(!cookie.value().contains("principal_id"));
    }

    #[actix_rt::test]
    async fn probes_sit_outside_the_api_scope() {
        let deps = deps(false);
        deps.health_state.mark_ready();
        let app = actix_test::init_service(build_app(deps)).await;
        for uri in ["/health/ready", "/health/live"] {
            let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }
}
