use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::auth::models::CompanyId;
use crate::domain::auth::models::TaxId;
use crate::domain::client::errors::ClientError;
use crate::domain::client::models::Client;
use crate::domain::client::models::ClientId;
use crate::domain::client::ports::ClientRepository;
use crate::outbound::repositories::user::is_unique_violation;

const CLIENTS_TAX_ID_CONSTRAINT: &str = "clients_company_id_tax_id_key";

/// PostgreSQL-backed implementation of the client repository.
#[derive(Clone)]
pub struct PostgresClientRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct ClientRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    tax_id: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    company_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = ClientError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Client {
            id: ClientId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            tax_id: row.tax_id.map(TaxId::new).transpose()?,
            phone: row.phone,
            email: row.email,
            address: row.address,
            company_id: CompanyId(row.company_id),
            created_at: row.created_at,
        })
    }
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn create(&self, client: Client) -> Result<Client, ClientError> {
        let result = sqlx::query(
            "INSERT INTO clients (id, first_name, last_name, tax_id, phone, email, address, company_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(client.id.0)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(client.tax_id.as_ref().map(TaxId::as_str))
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(client.company_id.0)
        .bind(client.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(client),
            Err(e) if is_unique_violation(&e, CLIENTS_TAX_ID_CONSTRAINT) => {
                Err(ClientError::TaxIdAlreadyRegistered(
                    client
                        .tax_id
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                ))
            }
            Err(e) => Err(ClientError::DatabaseError(e.to_string())),
        }
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientError> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, tax_id, phone, email, address, company_id, created_at
             FROM clients WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        row.map(Client::try_from).transpose()
    }

    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Client>, ClientError> {
        let rows: Vec<ClientRow> = sqlx::query_as(
            "SELECT id, first_name, last_name, tax_id, phone, email, address, company_id, created_at
             FROM clients WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn update(&self, client: Client) -> Result<Client, ClientError> {
        let result = sqlx::query(
            "UPDATE clients
             SET first_name = $1, last_name = $2, tax_id = $3, phone = $4, email = $5, address = $6
             WHERE id = $7",
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(client.tax_id.as_ref().map(TaxId::as_str))
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(client.id.0)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(ClientError::NotFound(client.id.to_string()))
            }
            Ok(_) => Ok(client),
            Err(e) if is_unique_violation(&e, CLIENTS_TAX_ID_CONSTRAINT) => {
                Err(ClientError::TaxIdAlreadyRegistered(
                    client
                        .tax_id
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                ))
            }
            Err(e) => Err(ClientError::DatabaseError(e.to_string())),
        }
    }

    async fn delete(&self, id: &ClientId) -> Result<(), ClientError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ClientError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
