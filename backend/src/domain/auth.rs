//! Authentication primitives: credentials, registration, password digests.
//!
//! Inbound adapters hand raw strings to the constructors here; nothing in this
//! module knows about HTTP or sessions.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::{FieldErrors, Username};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;

const DIGEST_SCHEME: &str = "sha256";
const SALT_BYTES: usize = 16;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Examples
    /// ```
    /// use tourlens::domain::LoginCredentials;
    ///
    /// let creds = LoginCredentials::try_from_parts(" ada ", "pw").expect("valid");
    /// assert_eq!(creds.username(), "ada");
    /// ```
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A validated request to join the directory.
#[derive(Debug, Clone)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration payload.
    ///
    /// `password2` must repeat the first password exactly; password problems are
    /// reported under `password1`.
    pub fn try_from_parts(
        username: Option<&str>,
        password: Option<&str>,
        password2: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = match username.map(Username::new) {
            Some(Ok(name)) => Some(name),
            Some(Err(err)) => {
                errors.push("username", err.to_string());
                None
            }
            None => {
                errors.push("username", crate::domain::validation::REQUIRED);
                None
            }
        };

        match password {
            None => errors.push("password1", crate::domain::validation::REQUIRED),
            Some(pw) if pw.chars().count() < PASSWORD_MIN => errors.push(
                "password1",
                format!("This password is too short. It must contain at least {PASSWORD_MIN} characters."),
            ),
            Some(pw) if password2 != Some(pw) => {
                errors.push("non_field_errors", "The two password fields didn't match.");
            }
            Some(_) => {}
        }

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => Ok(Self {
                username,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Salted SHA-256 password digest in `sha256$<salt>$<hash>` form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Derive a digest for `password` with a fresh random salt.
    #[must_use]
    pub fn derive(password: &str) -> Self {
        let salt: [u8; SALT_BYTES] = rand::random();
        Self::with_salt(password, &salt)
    }

    fn with_salt(password: &str, salt: &[u8]) -> Self {
        let hash = hash(salt, password);
        Self(format!("{DIGEST_SCHEME}${}${}", hex::encode(salt), hex::encode(hash)))
    }

    /// Rehydrate a digest loaded from storage.
    #[must_use]
    pub fn from_stored(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form suitable for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check `password` against this digest.
    ///
    /// Malformed stored digests never verify.
    ///
    /// # Examples
    /// ```
    /// use tourlens::domain::PasswordDigest;
    ///
    /// let digest = PasswordDigest::derive("correct horse");
    /// assert!(digest.verify("correct horse"));
    /// assert!(!digest.verify("battery staple"));
    /// ```
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let mut parts = self.0.splitn(3, '$');
        let (Some(DIGEST_SCHEME), Some(salt), Some(expected)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
            return false;
        };
        let actual = hash(&salt, password);
        actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected.iter())
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

fn hash(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
