use async_trait::async_trait;

use crate::domain::auth::models::CompanyId;
use crate::domain::client::errors::ClientError;
use crate::domain::client::models::Client;
use crate::domain::client::models::ClientId;
use crate::domain::client::models::CreateClientCommand;
use crate::domain::client::models::UpdateClientCommand;

/// Port for client domain service operations.
///
/// Caller company is resolved from verified token claims and checked by the
/// tenant guard before every read or mutation.
#[async_trait]
pub trait ClientServicePort: Send + Sync + 'static {
    /// List the caller company's clients.
    ///
    /// # Errors
    /// * `Forbidden` - Caller has no company
    /// * `DatabaseError` - Database operation failed
    async fn list_clients(
        &self,
        caller_company: Option<CompanyId>,
    ) -> Result<Vec<Client>, ClientError>;

    /// Create a client owned by the caller's company.
    ///
    /// # Errors
    /// * `Forbidden` - Caller has no company
    /// * `TaxIdAlreadyRegistered` - Company already has a client with this tax id
    /// * `DatabaseError` - Database operation failed
    async fn create_client(
        &self,
        caller_company: Option<CompanyId>,
        command: CreateClientCommand,
    ) -> Result<Client, ClientError>;

    /// Update a client after checking ownership.
    ///
    /// # Errors
    /// * `NotFound` - Client does not exist
    /// * `Forbidden` - Client belongs to another company
    /// * `TaxIdAlreadyRegistered` - Company already has a client with the new tax id
    /// * `DatabaseError` - Database operation failed
    async fn update_client(
        &self,
        caller_company: Option<CompanyId>,
        id: &ClientId,
        command: UpdateClientCommand,
    ) -> Result<Client, ClientError>;

    /// Delete a client after checking ownership.
    ///
    /// # Errors
    /// * `NotFound` - Client does not exist
    /// * `Forbidden` - Client belongs to another company
    /// * `DatabaseError` - Database operation failed
    async fn delete_client(
        &self,
        caller_company: Option<CompanyId>,
        id: &ClientId,
    ) -> Result<(), ClientError>;
}

/// Persistence operations for the client aggregate.
#[async_trait]
pub trait ClientRepository: Send + Sync + 'static {
    /// # Errors
    /// * `TaxIdAlreadyRegistered` - `(company_id, tax_id)` constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, client: Client) -> Result<Client, ClientError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Client>, ClientError>;

    /// # Errors
    /// * `NotFound` - Client does not exist
    /// * `TaxIdAlreadyRegistered` - `(company_id, tax_id)` constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, client: Client) -> Result<Client, ClientError>;

    /// # Errors
    /// * `NotFound` - Client does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &ClientId) -> Result<(), ClientError>;
}
