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
use crate::domain::address::models::Address;
use crate::domain::address::models::AddressId;
use crate::domain::address::models::CreateAddressCommand;
use crate::domain::address::models::UpdateAddressCommand;
use crate::domain::address::ports::AddressServicePort;
use crate::domain::auth::errors::IdError;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<AddressData>>, ApiError> {
    state
        .address_service
        .list_addresses(caller.company_id)
        .await
        .map_err(ApiError::from)
        .map(|addresses| {
            ApiSuccess::new(
                StatusCode::OK,
                addresses.iter().map(AddressData::from).collect(),
            )
        })
}

pub async fn create_address(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CreateAddressRequest>,
) -> Result<ApiSuccess<AddressData>, ApiError> {
    state
        .address_service
        .create_address(caller.company_id, body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref address| ApiSuccess::new(StatusCode::CREATED, address.into()))
}

pub async fn update_address(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(address_id): Path<String>,
    Json(body): Json<UpdateAddressRequest>,
) -> Result<ApiSuccess<AddressData>, ApiError> {
    let id = parse_address_id(&address_id)?;

    state
        .address_service
        .update_address(caller.company_id, &id, body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref address| ApiSuccess::new(StatusCode::OK, address.into()))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(address_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_address_id(&address_id)?;

    state
        .address_service
        .delete_address(caller.company_id, &id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

fn parse_address_id(raw: &str) -> Result<AddressId, ApiError> {
    AddressId::from_string(raw)
        .map_err(|e: IdError| ApiError::UnprocessableEntity(format!("Invalid address id: {e}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAddressRequest {
    name: String,
    address: String,
    category: String,
    contact: Option<String>,
    comments: Option<String>,
}

impl CreateAddressRequest {
    fn into_command(self) -> CreateAddressCommand {
        CreateAddressCommand {
            name: self.name,
            address: self.address,
            category: self.category,
            contact: self.contact,
            comments: self.comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAddressRequest {
    name: Option<String>,
    address: Option<String>,
    category: Option<String>,
    contact: Option<String>,
    comments: Option<String>,
}

impl UpdateAddressRequest {
    fn into_command(self) -> UpdateAddressCommand {
        UpdateAddressCommand {
            name: self.name,
            address: self.address,
            category: self.category,
            contact: self.contact,
            comments: self.comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressData {
    pub id: String,
    pub name: String,
    pub address: String,
    pub category: String,
    pub contact: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Address> for AddressData {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id.to_string(),
            name: address.name.clone(),
            address: address.address.clone(),
            category: address.category.clone(),
            contact: address.contact.clone(),
            comments: address.comments.clone(),
            created_at: address.created_at,
        }
    }
}
