//! Session helpers keeping handlers free of actix-session details.
//!
//! The cookie only carries the principal id. Whether that principal still
//! exists, and whether it is an administrator, is decided per request by
//! [`crate::domain::PrincipalService::resolve`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, PrincipalId};

pub(crate) const PRINCIPAL_ID_KEY: &str = "principal_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember the signed-in principal and rotate the session key.
    pub fn persist_principal(&self, id: PrincipalId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(PRINCIPAL_ID_KEY, id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Principal id stored in the cookie, if any.
    ///
    /// A value that does not parse is treated as no session at all.
    pub fn principal_id(&self) -> Result<Option<PrincipalId>, Error> {
        let raw = self
            .0
            .get::<String>(PRINCIPAL_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match raw.parse::<PrincipalId>() {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid principal id in session cookie");
                Ok(None)
            }
        }
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::SessionExt;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    let id: PrincipalId = FIXTURE_ID.parse().expect("fixture id");
                    session.persist_principal(id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/tamper",
                web::get().to(|req: HttpRequest| async move {
                    req.get_session()
                        .insert(PRINCIPAL_ID_KEY, "not-a-uuid")
                        .expect("insert raw value");
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let body = session
                        .principal_id()?
                        .map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
                    Ok::<_, Error>(HttpResponse::Ok().body(body))
                }),
            )
            .route(
                "/purge",
                web::get().to(|session: SessionContext| async move {
                    session.purge();
                    HttpResponse::Ok()
                }),
            )
    }

    async fn read_principal<S>(app: &S, cookie: Cookie<'static>) -> String
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = test::call_service(
            app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    #[actix_web::test]
    async fn round_trips_principal_id() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        assert_eq!(read_principal(&app, session_cookie(&res)).await, FIXTURE_ID);
    }

    #[actix_web::test]
    async fn tampered_principal_id_reads_as_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;

        assert_eq!(read_principal(&app, session_cookie(&res)).await, "anonymous");
    }

    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;
        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/purge")
                .cookie(session_cookie(&set))
                .to_request(),
        )
        .await;

        let cleared = session_cookie(&res);
        assert_eq!(cleared.value(), "");
    }
}
