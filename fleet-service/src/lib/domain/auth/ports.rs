use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::NotifyError;
use crate::domain::auth::errors::ResetTokenError;
use crate::domain::auth::models::Company;
use crate::domain::auth::models::CompanyId;
use crate::domain::auth::models::CompanyName;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::PasswordResetToken;
use crate::domain::auth::models::IdentityProfile;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for authentication domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user, resolving or creating its company, and issue a
    /// session token.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Normalized email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Session, AuthError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidCredentials` - Password verification failed
    /// * `MissingCompany` - User is not assigned to a company
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, AuthError>;

    /// Mint and dispatch a password-reset token if the email is registered.
    ///
    /// Responds identically whether or not the user exists, and regardless of
    /// delivery outcome, to resist account enumeration.
    ///
    /// # Errors
    /// * `DatabaseError` - Ledger write failed
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Consume a reset token and overwrite the owner's password hash.
    ///
    /// # Errors
    /// * `TokenExpired` - Signed expiry or ledger expiry has passed
    /// * `InvalidToken` - Unknown, already consumed, or tampered token
    /// * `DatabaseError` - Database operation failed
    async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Resolve the user profile behind a session token.
    ///
    /// # Errors
    /// * `TokenExpired` / `InvalidToken` - Token did not verify
    /// * `UserNotFound` - Subject no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn current_identity(&self, token: &str) -> Result<IdentityProfile, AuthError>;
}

/// Persistence operations for the user and company aggregates.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user, resolving or lazily creating its company, as one
    /// atomic unit.
    ///
    /// Both inserts share a transaction so a failed user insert never leaves
    /// an orphan company row. Email uniqueness is enforced by the storage
    /// constraint, not by a prior lookup.
    ///
    /// # Arguments
    /// * `user` - User entity to create (`company_id` is filled in from the
    ///   resolved company)
    /// * `company_name` - Company to resolve or create
    ///
    /// # Returns
    /// The created user and its resolved company
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create_with_company(
        &self,
        user: User,
        company_name: &CompanyName,
    ) -> Result<(User, Company), AuthError>;

    /// Retrieve user by normalized email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve company by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, AuthError>;

    /// Overwrite a user's stored password hash.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError>;
}

/// Persisted ledger of outstanding password-reset tokens.
#[async_trait]
pub trait ResetTokenLedger: Send + Sync + 'static {
    /// Record an outstanding token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn store(&self, token: PasswordResetToken) -> Result<(), ResetTokenError>;

    /// Atomically look up and delete a token, returning its owner.
    ///
    /// Expiry and deletion are one indivisible storage operation, so a token
    /// can be consumed at most once even under concurrent attempts. An
    /// expired row is removed as a side effect of the failed lookup.
    ///
    /// # Errors
    /// * `NotFound` - No such outstanding token (never issued or already consumed)
    /// * `Expired` - Token found but past its expiry (row deleted)
    /// * `DatabaseError` - Database operation failed
    async fn consume(&self, token: &str) -> Result<UserId, ResetTokenError>;
}

/// Outbound channel carrying reset links to users.
#[async_trait]
pub trait ResetNotifier: Send + Sync + 'static {
    /// Deliver a reset token to the given address.
    ///
    /// # Errors
    /// * `SendFailed` - Delivery failed (callers log and swallow this; the
    ///   reset-request operation's response never depends on delivery)
    async fn send_reset_link(
        &self,
        recipient: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifyError>;
}
