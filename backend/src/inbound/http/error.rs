//! Domain errors rendered as HTTP responses.
//!
//! Every response carries the error JSON and, when known, the `trace-id`
//! header. Internal errors are replaced by a generic message so store or
//! driver details never reach clients. Extractor failures are folded into
//! the same payload through the handlers registered by
//! [`super::api_routes`].

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const REDACTED_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if !self.code().is_server_fault() {
            return builder.json(self);
        }

        error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        builder.json(self.redacted(REDACTED_MESSAGE))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

/// Malformed or oversized JSON bodies become `invalid_request`.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON body");
    Error::invalid_request(format!("malformed JSON body: {err}")).into()
}

/// Query strings that fail to deserialise become `invalid_request`.
pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    Error::invalid_request(format!("malformed query string: {err}")).into()
}

/// A path segment that cannot name a record cannot resolve to one.
pub(crate) fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "unparseable identifier");
    Error::not_found("Not found.").into()
}
