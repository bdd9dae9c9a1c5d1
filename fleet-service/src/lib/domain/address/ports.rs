use async_trait::async_trait;

use crate::domain::address::errors::AddressError;
use crate::domain::address::models::Address;
use crate::domain::address::models::AddressId;
use crate::domain::address::models::CreateAddressCommand;
use crate::domain::address::models::UpdateAddressCommand;
use crate::domain::auth::models::CompanyId;

/// Port for address domain service operations.
///
/// Every operation takes the caller's company as resolved from verified
/// token claims; the tenant guard is applied before any read or mutation.
#[async_trait]
pub trait AddressServicePort: Send + Sync + 'static {
    /// List the caller company's addresses.
    ///
    /// # Errors
    /// * `Forbidden` - Caller has no company
    /// * `DatabaseError` - Database operation failed
    async fn list_addresses(
        &self,
        caller_company: Option<CompanyId>,
    ) -> Result<Vec<Address>, AddressError>;

    /// Create an address owned by the caller's company.
    ///
    /// # Errors
    /// * `Forbidden` - Caller has no company
    /// * `DatabaseError` - Database operation failed
    async fn create_address(
        &self,
        caller_company: Option<CompanyId>,
        command: CreateAddressCommand,
    ) -> Result<Address, AddressError>;

    /// Update an address after checking ownership.
    ///
    /// # Errors
    /// * `NotFound` - Address does not exist
    /// * `Forbidden` - Address belongs to another company
    /// * `DatabaseError` - Database operation failed
    async fn update_address(
        &self,
        caller_company: Option<CompanyId>,
        id: &AddressId,
        command: UpdateAddressCommand,
    ) -> Result<Address, AddressError>;

    /// Delete an address after checking ownership.
    ///
    /// # Errors
    /// * `NotFound` - Address does not exist
    /// * `Forbidden` - Address belongs to another company
    /// * `DatabaseError` - Database operation failed
    async fn delete_address(
        &self,
        caller_company: Option<CompanyId>,
        id: &AddressId,
    ) -> Result<(), AddressError>;
}

/// Persistence operations for the address aggregate.
#[async_trait]
pub trait AddressRepository: Send + Sync + 'static {
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, address: Address) -> Result<Address, AddressError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &AddressId) -> Result<Option<Address>, AddressError>;

    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Address>, AddressError>;

    /// # Errors
    /// * `NotFound` - Address does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, address: Address) -> Result<Address, AddressError>;

    /// # Errors
    /// * `NotFound` - Address does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &AddressId) -> Result<(), AddressError>;
}
