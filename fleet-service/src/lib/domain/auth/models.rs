use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::CompanyNameError;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::IdError;
use crate::domain::auth::errors::TaxIdError;

/// User aggregate entity.
///
/// The credential store record: the password hash is only ever produced by
/// the password hasher, never taken from user input.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub name: String,
    pub last_name: String,
    pub company_id: Option<CompanyId>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Company aggregate entity, the tenant boundary.
#[derive(Debug, Clone)]
pub struct Company {
    pub id: CompanyId,
    pub name: CompanyName,
    pub tax_id: Option<TaxId>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Company unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompanyId(pub Uuid);

impl CompanyId {
    /// Generate a new random company ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a company ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(CompanyId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Normalizes to trimmed lowercase before validating against RFC 5322, so
/// equality and the storage unique constraint both operate on the canonical
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, case-normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Company name value type
///
/// Non-empty after trimming, at most 120 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyName(String);

impl CompanyName {
    const MAX_LENGTH: usize = 120;

    /// Create a new valid company name.
    ///
    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name exceeds 120 characters
    pub fn new(name: String) -> Result<Self, CompanyNameError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CompanyNameError::Empty);
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(CompanyNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: name.len(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tax identifier (NIF) value type
///
/// Two to nine uppercase alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxId(String);

impl TaxId {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 9;

    /// Create a new valid tax identifier.
    ///
    /// # Errors
    /// * `InvalidFormat` - Wrong length or non-alphanumeric characters
    pub fn new(tax_id: String) -> Result<Self, TaxIdError> {
        let tax_id = tax_id.trim().to_string();
        let valid_length = (Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&tax_id.len());
        let valid_chars = tax_id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

        if valid_length && valid_chars {
            Ok(Self(tax_id))
        } else {
            Err(TaxIdError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outstanding password-reset token ledger row.
///
/// A token is valid only while this row exists and `expires_at` has not
/// passed; consumption deletes the row, making every token single use.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub name: String,
    pub last_name: String,
    pub company_name: CompanyName,
    pub location: Option<String>,
}

/// A successfully authenticated user together with an issued session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub company: Company,
    pub token: String,
}

/// User profile resolved from a verified session token.
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    pub user: User,
    pub company: Option<Company>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_case_normalized() {
        let email = EmailAddress::new("  Ana.Garcia@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "ana.garcia@example.com");
    }

    #[test]
    fn test_email_rejects_invalid_format() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new("".to_string()).is_err());
    }

    #[test]
    fn test_company_name_rejects_blank() {
        assert!(matches!(
            CompanyName::new("   ".to_string()),
            Err(CompanyNameError::Empty)
        ));
    }

    #[test]
    fn test_company_name_rejects_too_long() {
        let result = CompanyName::new("x".repeat(121));
        assert!(matches!(result, Err(CompanyNameError::TooLong { .. })));
    }

    #[test]
    fn test_tax_id_format() {
        assert!(TaxId::new("B1234567".to_string()).is_ok());
        assert!(TaxId::new("A1".to_string()).is_ok());
        assert!(TaxId::new("b1234567".to_string()).is_err());
        assert!(TaxId::new("X".to_string()).is_err());
        assert!(TaxId::new("1234567890".to_string()).is_err());
        assert!(TaxId::new("B12-4567".to_string()).is_err());
    }

    #[test]
    fn test_user_id_round_trip() {
        let id = UserId::new();
        let parsed = UserId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        assert!(UserId::from_string("not-a-uuid").is_err());
    }
}
