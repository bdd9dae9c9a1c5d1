use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::IdError;
use crate::domain::auth::models::CompanyId;
use crate::domain::auth::models::TaxId;

/// A customer record scoped to a company.
///
/// A company registers a given tax id at most once; the storage layer
/// enforces the `(company_id, tax_id)` uniqueness.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub tax_id: Option<TaxId>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
}

/// Client unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(ClientId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new client; owning company comes from the caller's
/// verified identity.
#[derive(Debug)]
pub struct CreateClientCommand {
    pub first_name: String,
    pub last_name: String,
    pub tax_id: Option<TaxId>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Command to update an existing client with optional fields.
#[derive(Debug, Default)]
pub struct UpdateClientCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tax_id: Option<TaxId>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}
