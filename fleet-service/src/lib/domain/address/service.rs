use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::address::errors::AddressError;
use crate::domain::address::models::Address;
use crate::domain::address::models::AddressId;
use crate::domain::address::models::CreateAddressCommand;
use crate::domain::address::models::UpdateAddressCommand;
use crate::domain::address::ports::AddressRepository;
use crate::domain::address::ports::AddressServicePort;
use crate::domain::auth::models::CompanyId;
use crate::domain::tenant;

/// Domain service implementation for company-scoped address operations.
pub struct AddressService<AR>
where
    AR: AddressRepository,
{
    repository: Arc<AR>,
}

impl<AR> AddressService<AR>
where
    AR: AddressRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }

    /// Fetch an address and check the caller may touch it.
    async fn find_owned(
        &self,
        caller_company: Option<CompanyId>,
        id: &AddressId,
    ) -> Result<Address, AddressError> {
        let address = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AddressError::NotFound(id.to_string()))?;

        tenant::authorize(address.company_id, caller_company)?;

        Ok(address)
    }
}

#[async_trait]
impl<AR> AddressServicePort for AddressService<AR>
where
    AR: AddressRepository,
{
    async fn list_addresses(
        &self,
        caller_company: Option<CompanyId>,
    ) -> Result<Vec<Address>, AddressError> {
        let company = tenant::require_company(caller_company)?;
        self.repository.list_by_company(&company).await
    }

    async fn create_address(
        &self,
        caller_company: Option<CompanyId>,
        command: CreateAddressCommand,
    ) -> Result<Address, AddressError> {
        let company = tenant::require_company(caller_company)?;

        let address = Address {
            id: AddressId::new(),
            name: command.name,
            address: command.address,
            category: command.category,
            contact: command.contact,
            comments: command.comments,
            company_id: company,
            created_at: Utc::now(),
        };

        self.repository.create(address).await
    }

    async fn update_address(
        &self,
        caller_company: Option<CompanyId>,
        id: &AddressId,
        command: UpdateAddressCommand,
    ) -> Result<Address, AddressError> {
        let mut address = self.find_owned(caller_company, id).await?;

        if let Some(name) = command.name {
            address.name = name;
        }
        if let Some(line) = command.address {
            address.address = line;
        }
        if let Some(category) = command.category {
            address.category = category;
        }
        if let Some(contact) = command.contact {
            address.contact = Some(contact);
        }
        if let Some(comments) = command.comments {
            address.comments = Some(comments);
        }

        self.repository.update(address).await
    }

    async fn delete_address(
        &self,
        caller_company: Option<CompanyId>,
        id: &AddressId,
    ) -> Result<(), AddressError> {
        let address = self.find_owned(caller_company, id).await?;
        self.repository.delete(&address.id).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::tenant::TenantError;

    mock! {
        pub TestAddressRepository {}

        #[async_trait]
        impl AddressRepository for TestAddressRepository {
            async fn create(&self, address: Address) -> Result<Address, AddressError>;
            async fn find_by_id(&self, id: &AddressId) -> Result<Option<Address>, AddressError>;
            async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Address>, AddressError>;
            async fn update(&self, address: Address) -> Result<Address, AddressError>;
            async fn delete(&self, id: &AddressId) -> Result<(), AddressError>;
        }
    }

    fn make_address(company: CompanyId) -> Address {
        Address {
            id: AddressId::new(),
            name: "Almacén central".to_string(),
            address: "Calle Mayor 1, Madrid".to_string(),
            category: "warehouse".to_string(),
            contact: None,
            comments: None,
            company_id: company,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_stamps_caller_company() {
        let company = CompanyId::new();

        let mut repository = MockTestAddressRepository::new();
        repository
            .expect_create()
            .withf(move |address| address.company_id == company)
            .times(1)
            .returning(|address| Ok(address));

        let service = AddressService::new(Arc::new(repository));

        let command = CreateAddressCommand {
            name: "Almacén central".to_string(),
            address: "Calle Mayor 1, Madrid".to_string(),
            category: "warehouse".to_string(),
            contact: None,
            comments: None,
        };

        let created = service.create_address(Some(company), command).await.unwrap();
        assert_eq!(created.company_id, company);
    }

    #[tokio::test]
    async fn test_create_without_company_is_forbidden() {
        let mut repository = MockTestAddressRepository::new();
        repository.expect_create().times(0);

        let service = AddressService::new(Arc::new(repository));

        let command = CreateAddressCommand {
            name: "Almacén central".to_string(),
            address: "Calle Mayor 1, Madrid".to_string(),
            category: "warehouse".to_string(),
            contact: None,
            comments: None,
        };

        let result = service.create_address(None, command).await;
        assert!(matches!(
            result,
            Err(AddressError::Forbidden(TenantError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn test_list_scopes_to_caller_company() {
        let company = CompanyId::new();

        let mut repository = MockTestAddressRepository::new();
        let listed = vec![make_address(company)];
        repository
            .expect_list_by_company()
            .withf(move |c| *c == company)
            .times(1)
            .returning(move |_| Ok(listed.clone()));

        let service = AddressService::new(Arc::new(repository));

        let addresses = service.list_addresses(Some(company)).await.unwrap();
        assert_eq!(addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_update_cross_tenant_is_forbidden() {
        let owner = CompanyId::new();
        let caller = CompanyId::new();
        let address = make_address(owner);

        let mut repository = MockTestAddressRepository::new();
        let returned = address.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository.expect_update().times(0);

        let service = AddressService::new(Arc::new(repository));

        let result = service
            .update_address(Some(caller), &address.id, UpdateAddressCommand::default())
            .await;
        assert!(matches!(
            result,
            Err(AddressError::Forbidden(TenantError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let company = CompanyId::new();
        let address = make_address(company);

        let mut repository = MockTestAddressRepository::new();
        let returned = address.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository
            .expect_update()
            .withf(|address| {
                address.name == "Muelle norte" && address.category == "warehouse"
            })
            .times(1)
            .returning(|address| Ok(address));

        let service = AddressService::new(Arc::new(repository));

        let command = UpdateAddressCommand {
            name: Some("Muelle norte".to_string()),
            ..Default::default()
        };

        let updated = service
            .update_address(Some(company), &address.id, command)
            .await
            .unwrap();
        assert_eq!(updated.name, "Muelle norte");
    }

    #[tokio::test]
    async fn test_delete_missing_address_is_not_found() {
        let mut repository = MockTestAddressRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_delete().times(0);

        let service = AddressService::new(Arc::new(repository));

        let result = service
            .delete_address(Some(CompanyId::new()), &AddressId::new())
            .await;
        assert!(matches!(result, Err(AddressError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_owned_address() {
        let company = CompanyId::new();
        let address = make_address(company);
        let address_id = address.id;

        let mut repository = MockTestAddressRepository::new();
        let returned = address.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository
            .expect_delete()
            .withf(move |id| *id == address_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = AddressService::new(Arc::new(repository));

        assert!(service
            .delete_address(Some(company), &address.id)
            .await
            .is_ok());
    }
}
