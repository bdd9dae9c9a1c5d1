use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::addresses::create_address;
use super::handlers::addresses::delete_address;
use super::handlers::addresses::list_addresses;
use super::handlers::addresses::update_address;
use super::handlers::clients::create_client;
use super::handlers::clients::delete_client;
use super::handlers::clients::list_clients;
use super::handlers::clients::update_client;
use super::handlers::current_user::current_user;
use super::handlers::forgot_password::forgot_password;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::middleware::authenticate as auth_middleware;
use crate::domain::address::service::AddressService;
use crate::domain::auth::service::AuthService;
use crate::domain::client::service::ClientService;
use crate::outbound::notifications::SmtpResetNotifier;
use crate::outbound::repositories::PostgresAddressRepository;
use crate::outbound::repositories::PostgresClientRepository;
use crate::outbound::repositories::PostgresResetTokenLedger;
use crate::outbound::repositories::PostgresUserRepository;

type WiredAuthService =
    AuthService<PostgresUserRepository, PostgresResetTokenLedger, SmtpResetNotifier>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<WiredAuthService>,
    pub address_service: Arc<AddressService<PostgresAddressRepository>>,
    pub client_service: Arc<ClientService<PostgresClientRepository>>,
    pub token_issuer: Arc<TokenIssuer>,
}

pub fn create_router(
    auth_service: Arc<WiredAuthService>,
    address_service: Arc<AddressService<PostgresAddressRepository>>,
    client_service: Arc<ClientService<PostgresClientRepository>>,
    token_issuer: Arc<TokenIssuer>,
) -> Router {
    let state = AppState {
        auth_service,
        address_service,
        client_service,
        token_issuer,
    };

    // /api/me verifies its own bearer token inside the auth service, so it
    // lives with the public routes.
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/me", get(current_user));

    let protected_routes = Router::new()
        .route("/api/addresses", get(list_addresses))
        .route("/api/addresses", post(create_address))
        .route("/api/addresses/:address_id", put(update_address))
        .route("/api/addresses/:address_id", delete(delete_address))
        .route("/api/clients", get(list_clients))
        .route("/api/clients", post(create_client))
        .route("/api/clients/:client_id", put(update_client))
        .route("/api/clients/:client_id", delete(delete_client))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
