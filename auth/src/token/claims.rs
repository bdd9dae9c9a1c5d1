use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Discriminates the two token kinds minted with the same signing key.
///
/// A session token must never be accepted where a reset token is required
/// (or the other way around), so every claim set carries its purpose and
/// verifiers check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    Reset,
}

/// Claim set for session (login) tokens. Hours-scale TTL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Company the user belongs to, if assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    pub purpose: TokenPurpose,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create session claims expiring `ttl_hours` from now.
    pub fn new(user_id: impl ToString, company_id: Option<String>, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            sub: user_id.to_string(),
            company_id,
            purpose: TokenPurpose::Session,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

/// Claim set for password-reset tokens. Minutes-scale TTL, user id only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResetClaims {
    /// Subject (user identifier)
    pub sub: String,

    pub purpose: TokenPurpose,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl ResetClaims {
    /// Create reset claims expiring `ttl_minutes` from now.
    pub fn new(user_id: impl ToString, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::minutes(ttl_minutes);

        Self {
            sub: user_id.to_string(),
            purpose: TokenPurpose::Reset,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_claims_ttl() {
        let claims = SessionClaims::new("user123", Some("company456".to_string()), 24);

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.company_id, Some("company456".to_string()));
        assert_eq!(claims.purpose, TokenPurpose::Session);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_session_claims_without_company() {
        let claims = SessionClaims::new("user123", None, 1);
        assert!(claims.company_id.is_none());
    }

    #[test]
    fn test_reset_claims_ttl() {
        let claims = ResetClaims::new("user123", 15);

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.purpose, TokenPurpose::Reset);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }
}
