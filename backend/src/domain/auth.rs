//! Authentication primitives: login credentials and password verifiers.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords live in [`Password`], which zeroises its buffer on
//! drop; stored credentials only ever hold the derived [`PasswordVerifier`].

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use zeroize::Zeroizing;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// A plaintext password in transit.
///
/// ## Invariants
/// - Non-empty. Caller-provided whitespace is retained to avoid surprising
///   credential comparisons.
///
/// The buffer is zeroised when the value is dropped and is never printed by
/// the `Debug` implementation.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a password from raw input.
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Errors raised while deriving or checking a password verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordVerifierError {
    /// The hashing backend rejected the derivation parameters.
    #[error("failed to derive password verifier: {message}")]
    Derivation {
        /// Backend diagnostic.
        message: String,
    },
    /// The stored verifier is not a valid PHC string.
    #[error("stored password verifier is malformed: {message}")]
    Malformed {
        /// Backend diagnostic.
        message: String,
    },
}

/// An opaque, irreversible representation of a password.
///
/// Stored as an Argon2 PHC string. The plaintext password is never stored,
/// serialised, or exposed through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordVerifier(String);

impl PasswordVerifier {
    /// Derive a verifier from a plaintext password with a fresh salt.
    pub fn derive(password: &Password) -> Result<Self, PasswordVerifierError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|err| PasswordVerifierError::Derivation {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Check a plaintext password against this verifier.
    ///
    /// Returns `Ok(false)` on mismatch; only a malformed stored verifier is
    /// an error.
    pub fn matches(&self, password: &Password) -> Result<bool, PasswordVerifierError> {
        let parsed =
            PasswordHash::new(self.0.as_str()).map_err(|err| PasswordVerifierError::Malformed {
                message: err.to_string(),
            })?;
        Ok(Argon2::default()
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok())
    }
}

impl fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordVerifier(<redacted>)")
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty (see [`Password`]).
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    username: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }

        let password = Password::new(password)?;

        Ok(Self {
            username: normalized.to_owned(),
            password,
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "pw", CredentialValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialValidationError::EmptyUsername)]
    #[case("user", "", CredentialValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  bob  ", "bobpass")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password().as_str(), password);
    }

    #[test]
    fn verifier_accepts_matching_password() {
        let password = Password::new("bobpass").expect("password shape");
        let verifier = PasswordVerifier::derive(&password).expect("derivation succeeds");
        assert!(verifier.matches(&password).expect("well-formed verifier"));
    }

    #[test]
    fn verifier_rejects_other_password() {
        let password = Password::new("bobpass").expect("password shape");
        let other = Password::new("robpass").expect("password shape");
        let verifier = PasswordVerifier::derive(&password).expect("derivation succeeds");
        assert!(!verifier.matches(&other).expect("well-formed verifier"));
    }

    #[test]
    fn verifier_is_salted() {
        let password = Password::new("bobpass").expect("password shape");
        let first = PasswordVerifier::derive(&password).expect("derivation succeeds");
        let second = PasswordVerifier::derive(&password).expect("derivation succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn debug_output_is_redacted() {
        let password = Password::new("bobpass").expect("password shape");
        let verifier = PasswordVerifier::derive(&password).expect("derivation succeeds");
        assert_eq!(format!("{password:?}"), "Password(<redacted>)");
        assert_eq!(format!("{verifier:?}"), "PasswordVerifier(<redacted>)");
    }
}
