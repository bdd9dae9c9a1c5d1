use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::forgot_password::MessageData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    if body.password.trim().is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Field must not be empty: password".to_string(),
        ));
    }

    state
        .auth_service
        .complete_password_reset(&body.token, &body.password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "Password reset successfully".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    password: String,
}
