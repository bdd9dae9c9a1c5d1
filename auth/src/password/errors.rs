use thiserror::Error;

/// Error type for password hashing.
///
/// Verification has no error path: a digest that cannot be parsed is
/// reported as a mismatch, so callers cannot distinguish a malformed stored
/// digest from a wrong password.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
