//! Field-level validation helpers shared by every resource form.
//!
//! Validators accumulate messages into [`FieldErrors`] rather than stopping at
//! the first failure, so a single response can report every problem. The
//! accumulated map becomes an `invalid_request` [`Error`] whose `details`
//! object is keyed by field name.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::domain::Error;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

/// Message reported under `detail` when a relationship pair already exists.
pub const POSSIBLE_DUPLICATE: &str = "possible duplicate";

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_owned()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Return `value` when nothing was recorded, otherwise the errors.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    fn to_details(&self) -> Value {
        let map = self
            .0
            .iter()
            .map(|(field, messages)| (field.clone(), json!(messages)))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::invalid_request("validation failed").with_details(errors.to_details())
    }
}

/// Validation error for a relationship pair that already exists.
///
/// The message deliberately omits which constraint fired.
pub fn duplicate_error() -> Error {
    Error::invalid_request(POSSIBLE_DUPLICATE).with_details(json!({ "detail": POSSIBLE_DUPLICATE }))
}

/// Validation error for a reference to a record that does not exist.
///
/// # Examples
/// ```
/// use tourlens::domain::missing_reference_error;
///
/// let err = missing_reference_error("photo", "42");
/// assert_eq!(
///     err.details().and_then(|d| d["photo"][0].as_str()),
///     Some("Invalid pk \"42\" - object does not exist."),
/// );
/// ```
pub fn missing_reference_error(field: &str, value: &str) -> Error {
    let mut errors = FieldErrors::new();
    errors.push(field, format!("Invalid pk \"{value}\" - object does not exist."));
    errors.into()
}

fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

/// Validate a mandatory, non-blank text field capped at `max` characters.
///
/// Returns the trimmed value; the string is empty when an error was recorded.
pub(crate) fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<String>,
    max: Option<usize>,
) -> String {
    let Some(raw) = raw else {
        errors.push(field, REQUIRED);
        return String::new();
    };
    let value = raw.trim();
    if value.is_empty() {
        errors.push(field, BLANK);
        return String::new();
    }
    check_length(errors, field, value, max);
    value.to_owned()
}

/// Validate an optional text field, substituting `default` when absent.
///
/// An explicitly blank value is kept blank.
pub(crate) fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<String>,
    max: Option<usize>,
    default: &str,
) -> String {
    let value = raw.map_or_else(|| default.to_owned(), |raw| raw.trim().to_owned());
    check_length(errors, field, &value, max);
    value
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, max: Option<usize>) {
    if let Some(max) = max.filter(|max| value.chars().count() > *max) {
        errors.push(field, too_long(max));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("image", "one");
        errors.push("image", "two");
        errors.push("title", "three");

        let error: Error = errors.into();
        let details = error.details().expect("details present");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(details["image"], json!(["one", "two"]));
        assert_eq!(details["title"], json!(["three"]));
    }

    #[rstest]
    fn finish_returns_value_when_clean() {
        assert_eq!(FieldErrors::new().finish(5), Ok(5));
    }

    #[rstest]
    fn duplicate_error_hides_constraint_name() {
        let error = duplicate_error();
        assert_eq!(error.details(), Some(&json!({ "detail": "possible duplicate" })));
    }

    #[rstest]
    #[case(None, Some(REQUIRED))]
    #[case(Some("   "), Some(BLANK))]
    #[case(Some("abcdef"), Some("Ensure this field has no more than 5 characters."))]
    #[case(Some(" abc "), None)]
    fn required_text_reports_problems(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let mut errors = FieldErrors::new();
        let value = required_text(&mut errors, "title", raw.map(str::to_owned), Some(5));
        assert_eq!(
            errors.get("title").and_then(|m| m.first()).map(String::as_str),
            expected
        );
        if expected.is_none() {
            assert_eq!(value, "abc");
        }
    }

    #[rstest]
    #[case(None, "unstated")]
    #[case(Some(""), "")]
    #[case(Some(" Leica "), "Leica")]
    fn optional_text_applies_default_only_when_absent(
        #[case] raw: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut errors = FieldErrors::new();
        let value = optional_text(&mut errors, "camera_used", raw.map(str::to_owned), Some(100), "unstated");
        assert!(errors.is_empty());
        assert_eq!(value, expected);
    }
}
