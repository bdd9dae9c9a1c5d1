use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::address::errors::AddressError;
use crate::domain::address::models::Address;
use crate::domain::address::models::AddressId;
use crate::domain::address::ports::AddressRepository;
use crate::domain::auth::models::CompanyId;

/// PostgreSQL-backed implementation of the address repository.
#[derive(Clone)]
pub struct PostgresAddressRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct AddressRow {
    id: Uuid,
    name: String,
    address: String,
    category: String,
    contact: Option<String>,
    comments: Option<String>,
    company_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: AddressId(row.id),
            name: row.name,
            address: row.address,
            category: row.category,
            contact: row.contact,
            comments: row.comments,
            company_id: CompanyId(row.company_id),
            created_at: row.created_at,
        }
    }
}

impl PostgresAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PostgresAddressRepository {
    async fn create(&self, address: Address) -> Result<Address, AddressError> {
        sqlx::query(
            "INSERT INTO addresses (id, name, address, category, contact, comments, company_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(address.id.0)
        .bind(&address.name)
        .bind(&address.address)
        .bind(&address.category)
        .bind(&address.contact)
        .bind(&address.comments)
        .bind(address.company_id.0)
        .bind(address.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AddressError::DatabaseError(e.to_string()))?;

        Ok(address)
    }

    async fn find_by_id(&self, id: &AddressId) -> Result<Option<Address>, AddressError> {
        let row: Option<AddressRow> = sqlx::query_as(
            "SELECT id, name, address, category, contact, comments, company_id, created_at
             FROM addresses WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AddressError::DatabaseError(e.to_string()))?;

        Ok(row.map(Address::from))
    }

    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Address>, AddressError> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            "SELECT id, name, address, category, contact, comments, company_id, created_at
             FROM addresses WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AddressError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    async fn update(&self, address: Address) -> Result<Address, AddressError> {
        let result = sqlx::query(
            "UPDATE addresses
             SET name = $1, address = $2, category = $3, contact = $4, comments = $5
             WHERE id = $6",
        )
        .bind(&address.name)
        .bind(&address.address)
        .bind(&address.category)
        .bind(&address.contact)
        .bind(&address.comments)
        .bind(address.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AddressError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AddressError::NotFound(address.id.to_string()));
        }

        Ok(address)
    }

    async fn delete(&self, id: &AddressId) -> Result<(), AddressError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AddressError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AddressError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
