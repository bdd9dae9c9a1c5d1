use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::IdError;
use crate::domain::auth::models::CompanyId;

/// A saved location a company routes to (depot, loading dock, client site).
#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    pub address: String,
    pub category: String,
    pub contact: Option<String>,
    pub comments: Option<String>,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
}

/// Address unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressId(pub Uuid);

impl AddressId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(AddressId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AddressId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new address; the owning company always comes from the
/// caller's verified identity, never from the payload.
#[derive(Debug)]
pub struct CreateAddressCommand {
    pub name: String,
    pub address: String,
    pub category: String,
    pub contact: Option<String>,
    pub comments: Option<String>,
}

/// Command to update an existing address with optional fields.
///
/// Only provided fields are changed.
#[derive(Debug, Default)]
pub struct UpdateAddressCommand {
    pub name: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub contact: Option<String>,
    pub comments: Option<String>,
}
