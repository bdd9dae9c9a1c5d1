use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::register::CompanyData;
use super::register::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::IdentityProfile;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<CurrentUserResponseData>, ApiError> {
    let token = extract_bearer(&headers)?;

    state
        .auth_service
        .current_identity(token)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub user: UserData,
    pub company: Option<CompanyData>,
}

impl From<&IdentityProfile> for CurrentUserResponseData {
    fn from(profile: &IdentityProfile) -> Self {
        Self {
            user: UserData {
                id: profile.user.id.to_string(),
                email: profile.user.email.as_str().to_string(),
                name: profile.user.name.clone(),
                last_name: profile.user.last_name.clone(),
                location: profile.user.location.clone(),
                created_at: profile.user.created_at,
            },
            company: profile.company.as_ref().map(|company| CompanyData {
                id: company.id.to_string(),
                name: company.name.as_str().to_string(),
                tax_id: company.tax_id.as_ref().map(|t| t.to_string()),
            }),
        }
    }
}
