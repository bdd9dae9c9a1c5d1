use thiserror::Error;

use crate::domain::auth::errors::IdError;
use crate::domain::auth::errors::TaxIdError;
use crate::domain::tenant::TenantError;

/// Top-level error for client operations
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("Invalid client id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Invalid tax id: {0}")]
    InvalidTaxId(#[from] TaxIdError),

    #[error("Client not found: {0}")]
    NotFound(String),

    #[error("Tax id already registered for this company: {0}")]
    TaxIdAlreadyRegistered(String),

    #[error(transparent)]
    Forbidden(#[from] TenantError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
