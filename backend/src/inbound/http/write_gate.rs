//! Rejects anonymous writes before any extractor runs.
//!
//! An anonymous unsafe request gets the forbidden error whatever its body or
//! path segments contain. Authenticated writes pass through; the services
//! still apply the per-record policies. The resolved requester stays in the
//! request extensions for the handler.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{Error, FromRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedOrReadOnly, Operation, authorize};
use crate::inbound::http::requester::CurrentRequester;

/// Gate applied to every resource route under `/api/v1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteGate;

impl<S, B> Transform<S, ServiceRequest> for WriteGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = WriteGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(WriteGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service produced by [`WriteGate`].
pub struct WriteGateMiddleware<S> {
    service: Rc<S>,
}

fn write_operation(method: &Method) -> Option<Operation> {
    match *method {
        Method::POST => Some(Operation::Create),
        Method::PUT | Method::PATCH => Some(Operation::Update),
        Method::DELETE => Some(Operation::Delete),
        _ => None,
    }
}

impl<S, B> Service<ServiceRequest> for WriteGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(operation) = write_operation(req.method()) else {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        };
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let denied = match CurrentRequester::extract(req.request()).await {
                Ok(requester) => {
                    authorize(&AuthenticatedOrReadOnly, requester.get(), operation, None)
                        .err()
                        .map(Error::from)
                }
                Err(error) => Some(error),
            };
            match denied {
                None => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Some(error) => {
                    debug!(method = %req.method(), path = req.path(), "write rejected before extraction");
                    Ok(req.error_response(error).map_into_right_body())
                }
            }
        })
    }
}
