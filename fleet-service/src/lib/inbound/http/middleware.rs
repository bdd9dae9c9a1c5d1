use auth::SessionClaims;
use auth::TokenPurpose;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::auth::models::CompanyId;
use crate::domain::auth::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified caller identity.
///
/// The company here comes from the token claims alone; handlers scope every
/// query with it and never accept a tenant id from the payload.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub company_id: Option<CompanyId>,
}

/// Middleware that verifies session tokens and adds caller info to request
/// extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_token_from_header(&req)?;

    let claims: SessionClaims = state.token_issuer.verify(token).map_err(|e| {
        tracing::warn!("Session token verification failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    // A reset token must never open a session
    if claims.purpose != TokenPurpose::Session {
        tracing::warn!("Token with wrong purpose presented as session token");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response());
    }

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::error!("Failed to parse user ID from token: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    let company_id = claims
        .company_id
        .as_deref()
        .map(CompanyId::from_string)
        .transpose()
        .map_err(|e| {
            tracing::error!("Failed to parse company ID from token: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid token format"
                })),
            )
                .into_response()
        })?;

    // Add authenticated caller info to request extensions
    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        company_id,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
