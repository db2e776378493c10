//! Extractor resolving the session cookie into a [`Requester`].

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::{FutureExt, LocalBoxFuture, ready};

use crate::domain::{Error, Requester};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The requester behind the current HTTP request.
///
/// Anonymous when there is no session, when the cookie value is unusable, or
/// when the stored principal no longer exists. Resolved at most once per
/// request; later extractions reuse the value kept in the request extensions.
#[derive(Debug, Clone, Copy)]
pub struct CurrentRequester(pub Requester);

impl CurrentRequester {
    pub fn get(&self) -> &Requester {
        &self.0
    }
}

impl FromRequest for CurrentRequester {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if let Some(resolved) = req.extensions().get::<Self>().copied() {
            return ready(Ok(resolved)).boxed_local();
        }
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let session = SessionContext::from_request(req, payload);
        let req = req.clone();
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let session = session.await?;
            let requester = Self(state.principals.resolve(session.principal_id()?).await?);
            req.extensions_mut().insert(requester);
            Ok(requester)
        })
    }
}
