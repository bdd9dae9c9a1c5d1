use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::CompanyNameError;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::models::CompanyName;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    name: String,
    last_name: String,
    company_name: String,
    location: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid company name: {0}")]
    CompanyName(#[from] CompanyNameError),

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        let company_name = CompanyName::new(self.company_name)?;
        let password = require_non_empty(self.password, "password")?;
        let name = require_non_empty(self.name, "name")?;
        let last_name = require_non_empty(self.last_name, "last_name")?;

        Ok(RegisterCommand {
            email,
            password,
            name,
            last_name,
            company_name,
            location: self.location,
        })
    }
}

fn require_non_empty(
    value: String,
    field: &'static str,
) -> Result<String, ParseRegisterRequestError> {
    if value.trim().is_empty() {
        return Err(ParseRegisterRequestError::EmptyField(field));
    }
    Ok(value)
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub user: UserData,
    pub company: CompanyData,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyData {
    pub id: String,
    pub name: String,
    pub tax_id: Option<String>,
}

impl From<&Session> for SessionResponseData {
    fn from(session: &Session) -> Self {
        Self {
            user: UserData {
                id: session.user.id.to_string(),
                email: session.user.email.as_str().to_string(),
                name: session.user.name.clone(),
                last_name: session.user.last_name.clone(),
                location: session.user.location.clone(),
                created_at: session.user.created_at,
            },
            company: CompanyData {
                id: session.company.id.to_string(),
                name: session.company.name.as_str().to_string(),
                tax_id: session.company.tax_id.as_ref().map(|t| t.to_string()),
            },
            token: session.token.clone(),
        }
    }
}
