use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Company;
use crate::domain::auth::models::CompanyId;
use crate::domain::auth::models::CompanyName;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::TaxId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL-backed implementation of the user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    last_name: String,
    company_id: Option<Uuid>,
    location: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    tax_id: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            name: row.name,
            last_name: row.last_name,
            company_id: row.company_id.map(CompanyId),
            location: row.location,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<CompanyRow> for Company {
    type Error = AuthError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        let tax_id = row
            .tax_id
            .map(TaxId::new)
            .transpose()
            .map_err(|e| AuthError::Unknown(e.to_string()))?;

        Ok(Company {
            id: CompanyId(row.id),
            name: CompanyName::new(row.name)?,
            tax_id,
            address: row.address,
            phone: row.phone,
            email: row.email,
        })
    }
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl crate::domain::auth::ports::UserRepository for PostgresUserRepository {
    async fn create_with_company(
        &self,
        mut user: User,
        company_name: &CompanyName,
    ) -> Result<(User, Company), AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        // Resolve the company by name or create it, inside the same
        // transaction as the user insert: a failed user insert rolls the
        // company back too.
        let existing: Option<CompanyRow> = sqlx::query_as(
            "SELECT id, name, tax_id, address, phone, email FROM companies WHERE name = $1",
        )
        .bind(company_name.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let company_row = match existing {
            Some(row) => row,
            None => {
                let inserted: Option<CompanyRow> = sqlx::query_as(
                    "INSERT INTO companies (id, name) VALUES ($1, $2)
                     ON CONFLICT (name) DO NOTHING
                     RETURNING id, name, tax_id, address, phone, email",
                )
                .bind(Uuid::new_v4())
                .bind(company_name.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

                match inserted {
                    Some(row) => row,
                    // Lost the race to a concurrent registration; the
                    // committed row is visible now.
                    None => sqlx::query_as(
                        "SELECT id, name, tax_id, address, phone, email \
                         FROM companies WHERE name = $1",
                    )
                    .bind(company_name.as_str())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| AuthError::DatabaseError(e.to_string()))?,
                }
            }
        };

        user.company_id = Some(CompanyId(company_row.id));

        let insert = sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, last_name, company_id, location, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(company_row.id)
        .bind(&user.location)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if is_unique_violation(&e, USERS_EMAIL_CONSTRAINT) {
                return Err(AuthError::EmailAlreadyExists(user.email.to_string()));
            }
            return Err(AuthError::DatabaseError(e.to_string()));
        }

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let company = Company::try_from(company_row)?;
        Ok((user, company))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, name, last_name, company_id, location, created_at
             FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, name, last_name, company_id, location, created_at
             FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, AuthError> {
        let row: Option<CompanyRow> = sqlx::query_as(
            "SELECT id, name, tax_id, address, phone, email FROM companies WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Company::try_from).transpose()
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(id.to_string()));
        }

        Ok(())
    }
}

/// Check whether a sqlx error is a unique violation on the given constraint.
pub(crate) fn is_unique_violation(error: &sqlx::Error, constraint: &str) -> bool {
    match error {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(
            &sqlx::Error::RowNotFound,
            USERS_EMAIL_CONSTRAINT
        ));
    }

    #[test]
    fn test_pool_timeout_is_not_unique_violation() {
        assert!(!is_unique_violation(
            &sqlx::Error::PoolTimedOut,
            USERS_EMAIL_CONSTRAINT
        ));
    }
}
