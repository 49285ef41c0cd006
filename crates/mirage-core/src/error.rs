//! Error taxonomy for the chat simulation.
//!
//! Three families, matching the three failure surfaces:
//!
//! - [`AuthError`]: local validation failures, surfaced immediately as a
//!   user-visible notification with no state mutation.
//! - [`StoreError`]: malformed persisted data, recovered silently by clearing
//!   the store and defaulting to anonymous. Never surfaced to the user.
//! - [`SendError`]: rejected message submissions, surfaced as a notification.
//!
//! No fatal errors exist in the core; all failure paths leave the system in a
//! well-defined prior state.

use thiserror::Error;

/// Validation failures raised by login and registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password was empty at submit time.
    #[error("invalid credentials")]
    MissingCredentials,

    /// Registration requires a username.
    #[error("username must not be empty")]
    MissingUsername,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password shorter than the minimum length.
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// Failures reading or writing the persisted session.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Persisted session payload failed to parse.
    #[error("malformed session payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Persisted token does not carry the demo-credential prefix.
    #[error("unrecognized token")]
    BadToken,

    /// Underlying storage failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected message submissions.
///
/// Rejections are explicit and observable rather than silent no-ops, so the
/// failure contract matches the login path. The timeline and counters are
/// untouched on rejection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// Trimmed message text was empty.
    #[error("message text is empty")]
    EmptyText,

    /// No authenticated session.
    #[error("not signed in")]
    NotAuthenticated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_render_user_facing_text() {
        assert_eq!(AuthError::PasswordMismatch.to_string(), "passwords do not match");
        assert_eq!(
            AuthError::PasswordTooShort.to_string(),
            "password must be at least 6 characters"
        );
    }

    #[test]
    fn store_error_wraps_json_failures() {
        let err = serde_json::from_str::<crate::types::Session>("not json")
            .map(|_| ())
            .expect_err("parse must fail");
        let store_err = StoreError::from(err);
        assert!(matches!(store_err, StoreError::Malformed(_)));
    }
}
