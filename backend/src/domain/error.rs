//! Failure payload shared by every use case.
//!
//! An [`Error`] is what a service returns and what an adapter renders. It
//! knows nothing about HTTP; the inbound layer picks a status from its
//! [`ErrorCode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TraceId;

/// Failure category, serialised in snake case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input or failed field validation.
    InvalidRequest,
    /// Missing or rejected credentials.
    Unauthorized,
    /// The requester lacks permission for the operation.
    Forbidden,
    /// No record with the given identifier.
    NotFound,
    /// The store could not be reached.
    ServiceUnavailable,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Whether the failure lies with the server rather than the caller.
    ///
    /// Messages of such errors may describe store internals and must not be
    /// shown to clients verbatim.
    #[must_use]
    pub fn is_server_fault(self) -> bool {
        matches!(self, Self::InternalError)
    }
}

/// Rejections from the checked constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// Blank message.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// Blank trace identifier.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

/// A domain failure.
///
/// The message is never blank and neither is the trace id when present.
/// Errors built while a request is in flight inherit its [`TraceId`].
///
/// # Examples
/// ```
/// use tourlens::domain::{Error, ErrorCode};
/// use serde_json::json;
///
/// let err = Error::invalid_request("validation failed")
///     .with_details(json!({ "title": ["This field is required."] }));
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.to_string(), "validation failed");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

fn non_blank(value: String, rejection: ErrorValidationError) -> Result<String, ErrorValidationError> {
    if value.trim().is_empty() {
        Err(rejection)
    } else {
        Ok(value)
    }
}

macro_rules! code_constructors {
    ($($(#[$meta:meta])* $name:ident => $code:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )+
    };
}

impl Error {
    /// Build an error from a literal message.
    ///
    /// # Panics
    /// Panics when `message` is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Build an error, rejecting a blank message.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        Ok(Self {
            code,
            message: non_blank(message.into(), ErrorValidationError::EmptyMessage)?,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    code_constructors! {
        /// Malformed input; carries field errors in `details` when built from them.
        invalid_request => InvalidRequest,
        /// Unknown principal or wrong password.
        unauthorized => Unauthorized,
        /// Denied by an access policy.
        forbidden => Forbidden,
        not_found => NotFound,
        /// Store connectivity failure.
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Field errors or other structured context.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Replace the trace id.
    ///
    /// # Panics
    /// Panics when `trace_id` is blank.
    #[must_use]
    pub fn with_trace_id(self, trace_id: impl Into<String>) -> Self {
        match self.try_with_trace_id(trace_id) {
            Ok(value) => value,
            Err(err) => panic!("trace identifiers must satisfy validation: {err}"),
        }
    }

    /// Replace the trace id, rejecting a blank one.
    pub fn try_with_trace_id(
        mut self,
        trace_id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        self.trace_id = Some(non_blank(trace_id.into(), ErrorValidationError::EmptyTraceId)?);
        Ok(self)
    }

    /// The same failure with `message` in place of the original text.
    ///
    /// Code and trace id survive; details are dropped.
    ///
    /// # Panics
    /// Panics when `message` is blank.
    #[must_use]
    pub fn redacted(&self, message: &str) -> Self {
        let mut replacement = Self::new(self.code, message);
        replacement.trace_id.clone_from(&self.trace_id);
        replacement
    }
}

/// Wire shape; optional members are omitted rather than null.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(error: Error) -> Self {
        Self {
            code: error.code,
            message: error.message,
            trace_id: error.trace_id,
            details: error.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(dto: ErrorDto) -> Result<Self, Self::Error> {
        // A decoded payload keeps its own trace id, never the ambient one.
        let trace_id = dto
            .trace_id
            .map(|id| non_blank(id, ErrorValidationError::EmptyTraceId))
            .transpose()?;
        Ok(Self {
            code: dto.code,
            message: non_blank(dto.message, ErrorValidationError::EmptyMessage)?,
            trace_id,
            details: dto.details,
        })
    }
}

#[cfg(test)]
mod tests;
