use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::ResetTokenError;
use crate::domain::auth::models::PasswordResetToken;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::ResetTokenLedger;

/// PostgreSQL-backed ledger of outstanding password-reset tokens.
#[derive(Clone)]
pub struct PostgresResetTokenLedger {
    pool: PgPool,
}

impl PostgresResetTokenLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResetTokenLedger for PostgresResetTokenLedger {
    async fn store(&self, token: PasswordResetToken) -> Result<(), ResetTokenError> {
        sqlx::query(
            "INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(&token.token)
        .bind(token.user_id.0)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ResetTokenError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn consume(&self, token: &str) -> Result<UserId, ResetTokenError> {
        // Single statement, so two concurrent consumers cannot both see the
        // row. The loser's DELETE matches nothing and reports NotFound.
        let row: Option<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            "DELETE FROM password_reset_tokens WHERE token = $1 RETURNING user_id, expires_at",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ResetTokenError::DatabaseError(e.to_string()))?;

        let (user_id, expires_at) = row.ok_or(ResetTokenError::NotFound)?;

        if expires_at <= Utc::now() {
            // Row is already gone, which doubles as lazy expiry cleanup.
            return Err(ResetTokenError::Expired);
        }

        Ok(UserId(user_id))
    }
}
