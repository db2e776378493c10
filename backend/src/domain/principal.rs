//! Principal directory model.
//!
//! A principal is the authenticated actor that owns every mutable record.
//! Each principal has exactly one [`Profile`](crate::domain::Profile), created
//! in the same store operation.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::PrincipalId;

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;

/// Validation errors returned by [`Username::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameValidationError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for UsernameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "This field may not be blank."),
            Self::TooLong { max } => {
                write!(f, "Ensure this field has no more than {max} characters.")
            }
            Self::InvalidCharacters => write!(
                f,
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            ),
        }
    }
}

impl std::error::Error for UsernameValidationError {}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Login name, unique across the directory.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`USERNAME_MAX`] characters.
/// - Only word characters and `.@+-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    ///
    /// # Examples
    /// ```
    /// use tourlens::domain::Username;
    ///
    /// assert!(Username::new("ada.lovelace").is_ok());
    /// assert!(Username::new("no spaces").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UsernameValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UsernameValidationError::TooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(trimmed) {
            return Err(UsernameValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Directory entry for an authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: Username,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Public identity of a record owner, joined into read models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSummary {
    pub principal_id: PrincipalId,
    pub username: Username,
    pub profile_id: crate::domain::ProfileId,
    pub profile_image: Option<crate::domain::ImageDescriptor>,
}
