//! Tests for the domain error payload and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("nope") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({ "code": "not_found", "message": "missing" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("payload decodes")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_snake_case_envelope(expected_trace_id: String) {
    let error = Error::invalid_request("validation failed")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "end_date": ["End date must be after start date"] }));

    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["trace_id"], expected_trace_id);
    assert_eq!(
        value["details"]["end_date"][0],
        "End date must be after start date"
    );
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({ "code": "forbidden", "message": " " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
#[case(ErrorCode::InternalError, true)]
#[case(ErrorCode::ServiceUnavailable, false)]
#[case(ErrorCode::Forbidden, false)]
fn only_internal_errors_are_server_faults(#[case] code: ErrorCode, #[case] expected: bool) {
    assert_eq!(code.is_server_fault(), expected);
}

#[rstest]
fn redaction_keeps_code_and_trace_but_drops_details(expected_trace_id: String) {
    let error = Error::internal("relation \"photos\" does not exist")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "sql": "SELECT 1" }));

    let redacted = error.redacted("Internal server error");

    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(expected_trace_id.as_str()));
    assert!(redacted.details().is_none());
}

#[rstest]
fn display_is_the_message() {
    assert_eq!(Error::not_found("photo 7 not found").to_string(), "photo 7 not found");
}
