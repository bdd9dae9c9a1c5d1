use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for UserId/CompanyId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for CompanyName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompanyNameError {
    #[error("Company name must not be empty")]
    Empty,

    #[error("Company name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for TaxId validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxIdError {
    #[error("Tax id must be 2 to 9 uppercase alphanumeric characters")]
    InvalidFormat,
}

/// Error for reset-token ledger operations.
///
/// `NotFound` covers both never-issued and already-consumed tokens; the
/// ledger cannot tell them apart once the row is gone, and callers must not
/// either.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResetTokenError {
    #[error("Reset token not found")]
    NotFound,

    #[error("Reset token is expired")]
    Expired,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Error for reset-link delivery failures
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("Failed to send reset message: {0}")]
    SendFailed(String),
}

/// Top-level error for authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid company name: {0}")]
    InvalidCompanyName(#[from] CompanyNameError),

    #[error("Invalid id: {0}")]
    InvalidId(#[from] IdError),

    // Domain-level errors
    #[error("Email already registered: {0}")]
    EmailAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is not assigned to a company")]
    MissingCompany,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid")]
    InvalidToken,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        // Hashing failures are infrastructure trouble, not caller mistakes
        AuthError::Unknown(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::BadSignature | TokenError::Malformed(_) => AuthError::InvalidToken,
            TokenError::EncodingFailed(e) => AuthError::Unknown(e),
        }
    }
}

impl From<ResetTokenError> for AuthError {
    fn from(err: ResetTokenError) -> Self {
        match err {
            ResetTokenError::NotFound => AuthError::InvalidToken,
            ResetTokenError::Expired => AuthError::TokenExpired,
            ResetTokenError::DatabaseError(e) => AuthError::DatabaseError(e),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
