use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::models::CompanyId;
use crate::domain::client::errors::ClientError;
use crate::domain::client::models::Client;
use crate::domain::client::models::ClientId;
use crate::domain::client::models::CreateClientCommand;
use crate::domain::client::models::UpdateClientCommand;
use crate::domain::client::ports::ClientRepository;
use crate::domain::client::ports::ClientServicePort;
use crate::domain::tenant;

/// Domain service implementation for company-scoped client operations.
pub struct ClientService<CR>
where
    CR: ClientRepository,
{
    repository: Arc<CR>,
}

impl<CR> ClientService<CR>
where
    CR: ClientRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }

    async fn find_owned(
        &self,
        caller_company: Option<CompanyId>,
        id: &ClientId,
    ) -> Result<Client, ClientError> {
        let client = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;

        tenant::authorize(client.company_id, caller_company)?;

        Ok(client)
    }
}

#[async_trait]
impl<CR> ClientServicePort for ClientService<CR>
where
    CR: ClientRepository,
{
    async fn list_clients(
        &self,
        caller_company: Option<CompanyId>,
    ) -> Result<Vec<Client>, ClientError> {
        let company = tenant::require_company(caller_company)?;
        self.repository.list_by_company(&company).await
    }

    async fn create_client(
        &self,
        caller_company: Option<CompanyId>,
        command: CreateClientCommand,
    ) -> Result<Client, ClientError> {
        let company = tenant::require_company(caller_company)?;

        let client = Client {
            id: ClientId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            tax_id: command.tax_id,
            phone: command.phone,
            email: command.email,
            address: command.address,
            company_id: company,
            created_at: Utc::now(),
        };

        self.repository.create(client).await
    }

    async fn update_client(
        &self,
        caller_company: Option<CompanyId>,
        id: &ClientId,
        command: UpdateClientCommand,
    ) -> Result<Client, ClientError> {
        let mut client = self.find_owned(caller_company, id).await?;

        if let Some(first_name) = command.first_name {
            client.first_name = first_name;
        }
        if let Some(last_name) = command.last_name {
            client.last_name = last_name;
        }
        if let Some(tax_id) = command.tax_id {
            client.tax_id = Some(tax_id);
        }
        if let Some(phone) = command.phone {
            client.phone = Some(phone);
        }
        if let Some(email) = command.email {
            client.email = Some(email);
        }
        if let Some(address) = command.address {
            client.address = Some(address);
        }

        self.repository.update(client).await
    }

    async fn delete_client(
        &self,
        caller_company: Option<CompanyId>,
        id: &ClientId,
    ) -> Result<(), ClientError> {
        let client = self.find_owned(caller_company, id).await?;
        self.repository.delete(&client.id).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::auth::models::TaxId;
    use crate::domain::tenant::TenantError;

    mock! {
        pub TestClientRepository {}

        #[async_trait]
        impl ClientRepository for TestClientRepository {
            async fn create(&self, client: Client) -> Result<Client, ClientError>;
            async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientError>;
            async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Client>, ClientError>;
            async fn update(&self, client: Client) -> Result<Client, ClientError>;
            async fn delete(&self, id: &ClientId) -> Result<(), ClientError>;
        }
    }

    fn make_client(company: CompanyId) -> Client {
        Client {
            id: ClientId::new(),
            first_name: "Luis".to_string(),
            last_name: "Moreno".to_string(),
            tax_id: Some(TaxId::new("B1234567".to_string()).unwrap()),
            phone: None,
            email: None,
            address: None,
            company_id: company,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_stamps_caller_company() {
        let company = CompanyId::new();

        let mut repository = MockTestClientRepository::new();
        repository
            .expect_create()
            .withf(move |client| client.company_id == company)
            .times(1)
            .returning(|client| Ok(client));

        let service = ClientService::new(Arc::new(repository));

        let command = CreateClientCommand {
            first_name: "Luis".to_string(),
            last_name: "Moreno".to_string(),
            tax_id: None,
            phone: None,
            email: None,
            address: None,
        };

        let created = service.create_client(Some(company), command).await.unwrap();
        assert_eq!(created.company_id, company);
    }

    #[tokio::test]
    async fn test_create_duplicate_tax_id_is_conflict() {
        let mut repository = MockTestClientRepository::new();
        repository.expect_create().times(1).returning(|client| {
            Err(ClientError::TaxIdAlreadyRegistered(
                client
                    .tax_id
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
            ))
        });

        let service = ClientService::new(Arc::new(repository));

        let command = CreateClientCommand {
            first_name: "Luis".to_string(),
            last_name: "Moreno".to_string(),
            tax_id: Some(TaxId::new("B1234567".to_string()).unwrap()),
            phone: None,
            email: None,
            address: None,
        };

        let result = service
            .create_client(Some(CompanyId::new()), command)
            .await;
        assert!(matches!(
            result,
            Err(ClientError::TaxIdAlreadyRegistered(_))
        ));
    }

    #[tokio::test]
    async fn test_list_without_company_fails_closed() {
        let mut repository = MockTestClientRepository::new();
        repository.expect_list_by_company().times(0);

        let service = ClientService::new(Arc::new(repository));

        let result = service.list_clients(None).await;
        assert!(matches!(
            result,
            Err(ClientError::Forbidden(TenantError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn test_delete_cross_tenant_is_forbidden() {
        let owner = CompanyId::new();
        let caller = CompanyId::new();
        let client = make_client(owner);

        let mut repository = MockTestClientRepository::new();
        let returned = client.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository.expect_delete().times(0);

        let service = ClientService::new(Arc::new(repository));

        let result = service.delete_client(Some(caller), &client.id).await;
        assert!(matches!(
            result,
            Err(ClientError::Forbidden(TenantError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let company = CompanyId::new();
        let client = make_client(company);

        let mut repository = MockTestClientRepository::new();
        let returned = client.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository
            .expect_update()
            .withf(|client| client.phone.as_deref() == Some("+34911222333"))
            .times(1)
            .returning(|client| Ok(client));

        let service = ClientService::new(Arc::new(repository));

        let command = UpdateClientCommand {
            phone: Some("+34911222333".to_string()),
            ..Default::default()
        };

        let updated = service
            .update_client(Some(company), &client.id, command)
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("+34911222333"));
    }
}
