use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::ResetClaims;
use auth::SessionClaims;
use auth::TokenIssuer;
use auth::TokenPurpose;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::IdentityProfile;
use crate::domain::auth::models::PasswordResetToken;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::ResetNotifier;
use crate::domain::auth::ports::ResetTokenLedger;
use crate::domain::auth::ports::UserRepository;

/// Token lifetimes, loaded from configuration.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtl {
    /// Session token lifetime (hours scale)
    pub session_hours: i64,
    /// Reset token lifetime (minutes scale)
    pub reset_minutes: i64,
}

/// Domain service implementation for authentication operations.
///
/// Orchestrates the credential store, password hasher, token issuer, and
/// reset-token ledger behind `AuthServicePort`.
pub struct AuthService<UR, RL, RN>
where
    UR: UserRepository,
    RL: ResetTokenLedger,
    RN: ResetNotifier,
{
    repository: Arc<UR>,
    ledger: Arc<RL>,
    notifier: Arc<RN>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    ttl: TokenTtl,
}

impl<UR, RL, RN> AuthService<UR, RL, RN>
where
    UR: UserRepository,
    RL: ResetTokenLedger,
    RN: ResetNotifier,
{
    /// Create a new auth service with injected dependencies.
    pub fn new(
        repository: Arc<UR>,
        ledger: Arc<RL>,
        notifier: Arc<RN>,
        token_issuer: Arc<TokenIssuer>,
        ttl: TokenTtl,
    ) -> Self {
        Self {
            repository,
            ledger,
            notifier,
            password_hasher: PasswordHasher::new(),
            token_issuer,
            ttl,
        }
    }

    fn issue_session_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = SessionClaims::new(
            user.id,
            user.company_id.map(|id| id.to_string()),
            self.ttl.session_hours,
        );
        Ok(self.token_issuer.issue(&claims)?)
    }
}

#[async_trait]
impl<UR, RL, RN> AuthServicePort for AuthService<UR, RL, RN>
where
    UR: UserRepository,
    RL: ResetTokenLedger,
    RN: ResetNotifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, AuthError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            name: command.name,
            last_name: command.last_name,
            company_id: None,
            location: command.location,
            created_at: Utc::now(),
        };

        // Company resolution and user insert are one transaction in the
        // repository; a duplicate email surfaces as a constraint violation,
        // never as two committed rows.
        let (user, company) = self
            .repository
            .create_with_company(user, &command.company_name)
            .await?;

        let token = self.issue_session_token(&user)?;

        tracing::info!(user_id = %user.id, company_id = %company.id, "User registered");

        Ok(Session {
            user,
            company,
            token,
        })
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))?;

        if !self.password_hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let company_id = user.company_id.ok_or(AuthError::MissingCompany)?;
        let company = self
            .repository
            .find_company(&company_id)
            .await?
            .ok_or(AuthError::MissingCompany)?;

        let token = self.issue_session_token(&user)?;

        Ok(Session {
            user,
            company,
            token,
        })
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let user = match self.repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                // Same acknowledgement as the found case; do not reveal
                // whether the address is registered.
                tracing::debug!("Password reset requested for unknown address");
                return Ok(());
            }
        };

        let claims = ResetClaims::new(user.id, self.ttl.reset_minutes);
        let token = self.token_issuer.issue(&claims)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::Unknown("reset expiry out of range".to_string()))?;

        self.ledger
            .store(PasswordResetToken {
                token: token.clone(),
                user_id: user.id,
                expires_at,
            })
            .await?;

        if let Err(e) = self.notifier.send_reset_link(&user.email, &token).await {
            // Delivery trouble must not change the response shape
            tracing::error!(user_id = %user.id, "Failed to deliver reset link: {}", e);
        }

        Ok(())
    }

    async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        // Both the signed expiry and the ledger row must still be valid
        let claims: ResetClaims = self.token_issuer.verify(token)?;
        if claims.purpose != TokenPurpose::Reset {
            return Err(AuthError::InvalidToken);
        }

        let user_id = self.ledger.consume(token).await?;
        if user_id.to_string() != claims.sub {
            return Err(AuthError::InvalidToken);
        }

        let password_hash = self.password_hasher.hash(new_password)?;
        self.repository
            .update_password_hash(&user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "Password reset completed");

        Ok(())
    }

    async fn current_identity(&self, token: &str) -> Result<IdentityProfile, AuthError> {
        let claims: SessionClaims = self.token_issuer.verify(token)?;
        if claims.purpose != TokenPurpose::Session {
            return Err(AuthError::InvalidToken);
        }

        let user_id = UserId::from_string(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;

        let company = match user.company_id {
            Some(company_id) => self.repository.find_company(&company_id).await?,
            None => None,
        };

        Ok(IdentityProfile { user, company })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::auth::errors::NotifyError;
    use crate::domain::auth::errors::ResetTokenError;
    use crate::domain::auth::models::Company;
    use crate::domain::auth::models::CompanyId;
    use crate::domain::auth::models::CompanyName;
    use crate::domain::auth::models::PasswordResetToken;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create_with_company(
                &self,
                user: User,
                company_name: &CompanyName,
            ) -> Result<(User, Company), AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;
            async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, AuthError>;
            async fn update_password_hash(
                &self,
                id: &UserId,
                password_hash: &str,
            ) -> Result<(), AuthError>;
        }
    }

    mock! {
        pub TestLedger {}

        #[async_trait]
        impl ResetTokenLedger for TestLedger {
            async fn store(&self, token: PasswordResetToken) -> Result<(), ResetTokenError>;
            async fn consume(&self, token: &str) -> Result<UserId, ResetTokenError>;
        }
    }

    mock! {
        pub TestNotifier {}

        #[async_trait]
        impl ResetNotifier for TestNotifier {
            async fn send_reset_link(
                &self,
                recipient: &EmailAddress,
                token: &str,
            ) -> Result<(), NotifyError>;
        }
    }

    const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes-long!";

    fn make_service(
        repository: MockTestUserRepository,
        ledger: MockTestLedger,
        notifier: MockTestNotifier,
    ) -> AuthService<MockTestUserRepository, MockTestLedger, MockTestNotifier> {
        AuthService::new(
            Arc::new(repository),
            Arc::new(ledger),
            Arc::new(notifier),
            Arc::new(TokenIssuer::new(TEST_SECRET)),
            TokenTtl {
                session_hours: 24,
                reset_minutes: 15,
            },
        )
    }

    fn make_company() -> Company {
        Company {
            id: CompanyId::new(),
            name: CompanyName::new("Transportes Vega".to_string()).unwrap(),
            tax_id: None,
            address: None,
            phone: None,
            email: None,
        }
    }

    fn make_user(company_id: Option<CompanyId>, password_hash: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new("ana@example.com".to_string()).unwrap(),
            password_hash: password_hash.to_string(),
            name: "Ana".to_string(),
            last_name: "García".to_string(),
            company_id,
            location: None,
            created_at: Utc::now(),
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand {
            email: EmailAddress::new("ana@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
            name: "Ana".to_string(),
            last_name: "García".to_string(),
            company_name: CompanyName::new("Transportes Vega".to_string()).unwrap(),
            location: None,
        }
    }

    #[tokio::test]
    async fn test_register_issues_verifiable_session_token() {
        let mut repository = MockTestUserRepository::new();
        let company = make_company();
        let company_id = company.id;

        repository
            .expect_create_with_company()
            .withf(|user, company_name| {
                user.email.as_str() == "ana@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && company_name.as_str() == "Transportes Vega"
            })
            .times(1)
            .returning(move |mut user, _| {
                user.company_id = Some(company_id);
                Ok((user, company.clone()))
            });

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let session = service.register(register_command()).await.unwrap();
        assert_eq!(session.company.id, company_id);

        let issuer = TokenIssuer::new(TEST_SECRET);
        let claims: SessionClaims = issuer.verify(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id.to_string());
        assert_eq!(claims.company_id, Some(company_id.to_string()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_conflict() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create_with_company()
            .times(1)
            .returning(|user, _| Err(AuthError::EmailAlreadyExists(user.email.to_string())));

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_resolves_same_user_id() {
        let hash = PasswordHasher::new().hash("password123").unwrap();
        let company = make_company();
        let user = make_user(Some(company.id), &hash);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        let returned_user = user.clone();
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "ana@example.com")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        let returned_company = company.clone();
        repository
            .expect_find_company()
            .times(1)
            .returning(move |_| Ok(Some(returned_company.clone())));

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let email = EmailAddress::new("ana@example.com".to_string()).unwrap();
        let session = service.login(&email, "password123").await.unwrap();

        let issuer = TokenIssuer::new(TEST_SECRET);
        let claims: SessionClaims = issuer.verify(&session.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let email = EmailAddress::new("nadie@example.com".to_string()).unwrap();
        let result = service.login(&email, "password123").await;
        assert!(matches!(result, Err(AuthError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let hash = PasswordHasher::new().hash("password123").unwrap();
        let user = make_user(Some(CompanyId::new()), &hash);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let email = EmailAddress::new("ana@example.com".to_string()).unwrap();
        let result = service.login(&email, "wrong_password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_without_company_is_forbidden() {
        let hash = PasswordHasher::new().hash("password123").unwrap();
        let user = make_user(None, &hash);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let email = EmailAddress::new("ana@example.com".to_string()).unwrap();
        let result = service.login(&email, "password123").await;
        assert!(matches!(result, Err(AuthError::MissingCompany)));
    }

    #[tokio::test]
    async fn test_reset_request_for_unknown_email_acknowledges_without_side_effects() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let mut ledger = MockTestLedger::new();
        ledger.expect_store().times(0);
        let mut notifier = MockTestNotifier::new();
        notifier.expect_send_reset_link().times(0);

        let service = make_service(repository, ledger, notifier);

        let email = EmailAddress::new("nadie@example.com".to_string()).unwrap();
        assert!(service.request_password_reset(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_request_stores_row_and_notifies() {
        let user = make_user(Some(CompanyId::new()), "$argon2id$irrelevant");
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let mut ledger = MockTestLedger::new();
        ledger
            .expect_store()
            .withf(move |row| {
                row.user_id == user_id && !row.token.is_empty() && row.expires_at > Utc::now()
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut notifier = MockTestNotifier::new();
        notifier
            .expect_send_reset_link()
            .withf(|recipient, token| {
                recipient.as_str() == "ana@example.com" && !token.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = make_service(repository, ledger, notifier);

        let email = EmailAddress::new("ana@example.com".to_string()).unwrap();
        assert!(service.request_password_reset(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_request_swallows_delivery_failure() {
        let user = make_user(Some(CompanyId::new()), "$argon2id$irrelevant");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let mut ledger = MockTestLedger::new();
        ledger.expect_store().times(1).returning(|_| Ok(()));

        let mut notifier = MockTestNotifier::new();
        notifier
            .expect_send_reset_link()
            .times(1)
            .returning(|_, _| Err(NotifyError::SendFailed("smtp down".to_string())));

        let service = make_service(repository, ledger, notifier);

        let email = EmailAddress::new("ana@example.com".to_string()).unwrap();
        assert!(service.request_password_reset(&email).await.is_ok());
    }

    #[tokio::test]
    async fn test_complete_reset_overwrites_password_hash() {
        let user_id = UserId::new();
        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer.issue(&ResetClaims::new(user_id, 15)).unwrap();

        let mut ledger = MockTestLedger::new();
        let expected_token = token.clone();
        ledger
            .expect_consume()
            .withf(move |t| t == expected_token)
            .times(1)
            .returning(move |_| Ok(user_id));

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_update_password_hash()
            .withf(move |id, hash| {
                *id == user_id && PasswordHasher::new().verify("new_password", hash)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = make_service(repository, ledger, MockTestNotifier::new());

        assert!(service
            .complete_password_reset(&token, "new_password")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let user_id = UserId::new();
        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer.issue(&ResetClaims::new(user_id, 15)).unwrap();

        // First consume wins, second finds no row
        let consumed = Mutex::new(false);
        let mut ledger = MockTestLedger::new();
        ledger.expect_consume().times(2).returning(move |_| {
            let mut consumed = consumed.lock().unwrap();
            if *consumed {
                Err(ResetTokenError::NotFound)
            } else {
                *consumed = true;
                Ok(user_id)
            }
        });

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_update_password_hash()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = make_service(repository, ledger, MockTestNotifier::new());

        assert!(service
            .complete_password_reset(&token, "new_password")
            .await
            .is_ok());

        let second = service.complete_password_reset(&token, "other_password").await;
        assert!(matches!(second, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_complete_reset_ledger_expired_token() {
        let user_id = UserId::new();
        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer.issue(&ResetClaims::new(user_id, 15)).unwrap();

        let mut ledger = MockTestLedger::new();
        ledger
            .expect_consume()
            .times(1)
            .returning(|_| Err(ResetTokenError::Expired));

        let service = make_service(MockTestUserRepository::new(), ledger, MockTestNotifier::new());

        let result = service.complete_password_reset(&token, "new_password").await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_complete_reset_elapsed_signed_expiry_never_touches_ledger() {
        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer.issue(&ResetClaims::new(UserId::new(), -2)).unwrap();

        let mut ledger = MockTestLedger::new();
        ledger.expect_consume().times(0);

        let service = make_service(MockTestUserRepository::new(), ledger, MockTestNotifier::new());

        let result = service.complete_password_reset(&token, "new_password").await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_complete_reset_rejects_garbage_token() {
        let mut ledger = MockTestLedger::new();
        ledger.expect_consume().times(0);

        let service = make_service(MockTestUserRepository::new(), ledger, MockTestNotifier::new());

        let result = service
            .complete_password_reset("invalid.token.here", "new_password")
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_complete_reset_rejects_session_token() {
        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer
            .issue(&SessionClaims::new(UserId::new(), None, 24))
            .unwrap();

        let mut ledger = MockTestLedger::new();
        ledger.expect_consume().times(0);

        let service = make_service(MockTestUserRepository::new(), ledger, MockTestNotifier::new());

        let result = service.complete_password_reset(&token, "new_password").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_current_identity_resolves_profile() {
        let company = make_company();
        let user = make_user(Some(company.id), "$argon2id$irrelevant");
        let user_id = user.id;

        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer
            .issue(&SessionClaims::new(
                user_id,
                Some(company.id.to_string()),
                24,
            ))
            .unwrap();

        let mut repository = MockTestUserRepository::new();
        let returned_user = user.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        let returned_company = company.clone();
        repository
            .expect_find_company()
            .times(1)
            .returning(move |_| Ok(Some(returned_company.clone())));

        let service = make_service(repository, MockTestLedger::new(), MockTestNotifier::new());

        let profile = service.current_identity(&token).await.unwrap();
        assert_eq!(profile.user.id, user_id);
        assert!(profile.company.is_some());
    }

    #[tokio::test]
    async fn test_current_identity_rejects_garbage_token() {
        let service = make_service(
            MockTestUserRepository::new(),
            MockTestLedger::new(),
            MockTestNotifier::new(),
        );

        let result = service.current_identity("invalid.token.here").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_current_identity_rejects_reset_token() {
        let issuer = TokenIssuer::new(TEST_SECRET);
        let token = issuer.issue(&ResetClaims::new(UserId::new(), 15)).unwrap();

        let service = make_service(
            MockTestUserRepository::new(),
            MockTestLedger::new(),
            MockTestNotifier::new(),
        );

        let result = service.current_identity(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
