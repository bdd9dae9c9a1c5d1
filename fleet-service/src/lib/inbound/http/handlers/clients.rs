use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::IdError;
use crate::domain::auth::models::TaxId;
use crate::domain::client::models::Client;
use crate::domain::client::models::ClientId;
use crate::domain::client::models::CreateClientCommand;
use crate::domain::client::models::UpdateClientCommand;
use crate::domain::client::ports::ClientServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_clients(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<ClientData>>, ApiError> {
    state
        .client_service
        .list_clients(caller.company_id)
        .await
        .map_err(ApiError::from)
        .map(|clients| {
            ApiSuccess::new(
                StatusCode::OK,
                clients.iter().map(ClientData::from).collect(),
            )
        })
}

pub async fn create_client(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CreateClientRequest>,
) -> Result<ApiSuccess<ClientData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .client_service
        .create_client(caller.company_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref client| ApiSuccess::new(StatusCode::CREATED, client.into()))
}

pub async fn update_client(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(client_id): Path<String>,
    Json(body): Json<UpdateClientRequest>,
) -> Result<ApiSuccess<ClientData>, ApiError> {
    let id = parse_client_id(&client_id)?;
    let command = body.try_into_command()?;

    state
        .client_service
        .update_client(caller.company_id, &id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref client| ApiSuccess::new(StatusCode::OK, client.into()))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(client_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_client_id(&client_id)?;

    state
        .client_service
        .delete_client(caller.company_id, &id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

fn parse_client_id(raw: &str) -> Result<ClientId, ApiError> {
    ClientId::from_string(raw)
        .map_err(|e: IdError| ApiError::UnprocessableEntity(format!("Invalid client id: {e}")))
}

fn parse_tax_id(raw: Option<String>) -> Result<Option<TaxId>, ApiError> {
    raw.map(TaxId::new)
        .transpose()
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid tax id: {e}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateClientRequest {
    first_name: String,
    last_name: String,
    tax_id: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
}

impl CreateClientRequest {
    fn try_into_command(self) -> Result<CreateClientCommand, ApiError> {
        Ok(CreateClientCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            tax_id: parse_tax_id(self.tax_id)?,
            phone: self.phone,
            email: self.email,
            address: self.address,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateClientRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    tax_id: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
}

impl UpdateClientRequest {
    fn try_into_command(self) -> Result<UpdateClientCommand, ApiError> {
        Ok(UpdateClientCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            tax_id: parse_tax_id(self.tax_id)?,
            phone: self.phone,
            email: self.email,
            address: self.address,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Client> for ClientData {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.to_string(),
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            tax_id: client.tax_id.as_ref().map(|t| t.to_string()),
            phone: client.phone.clone(),
            email: client.email.clone(),
            address: client.address.clone(),
            created_at: client.created_at,
        }
    }
}
