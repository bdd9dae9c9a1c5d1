use thiserror::Error;

use crate::domain::auth::errors::IdError;
use crate::domain::tenant::TenantError;

/// Top-level error for address operations
#[derive(Debug, Clone, Error)]
pub enum AddressError {
    #[error("Invalid address id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Address not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Forbidden(#[from] TenantError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
