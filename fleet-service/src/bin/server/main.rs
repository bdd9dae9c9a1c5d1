use std::sync::Arc;

use auth::TokenIssuer;
use fleet_service::config::Config;
use fleet_service::domain::address::service::AddressService;
use fleet_service::domain::auth::service::AuthService;
use fleet_service::domain::auth::service::TokenTtl;
use fleet_service::domain::client::service::ClientService;
use fleet_service::inbound::http::router::create_router;
use fleet_service::outbound::notifications::SmtpResetNotifier;
use fleet_service::outbound::repositories::PostgresAddressRepository;
use fleet_service::outbound::repositories::PostgresClientRepository;
use fleet_service::outbound::repositories::PostgresResetTokenLedger;
use fleet_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "fleet-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        session_ttl_hours = config.jwt.session_ttl_hours,
        reset_ttl_minutes = config.jwt.reset_ttl_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_issuer = Arc::new(TokenIssuer::new(config.jwt.secret.as_bytes()));
    let ttl = TokenTtl {
        session_hours: config.jwt.session_ttl_hours,
        reset_minutes: config.jwt.reset_ttl_minutes,
    };

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let reset_token_ledger = Arc::new(PostgresResetTokenLedger::new(pg_pool.clone()));
    let reset_notifier = Arc::new(SmtpResetNotifier::new(&config.mail)?);

    let auth_service = Arc::new(AuthService::new(
        user_repository,
        reset_token_ledger,
        reset_notifier,
        Arc::clone(&token_issuer),
        ttl,
    ));

    let address_repository = Arc::new(PostgresAddressRepository::new(pg_pool.clone()));
    let address_service = Arc::new(AddressService::new(address_repository));

    let client_repository = Arc::new(PostgresClientRepository::new(pg_pool));
    let client_service = Arc::new(ClientService::new(client_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        address_service,
        client_service,
        token_issuer,
    );

    axum::serve(http_listener, http_application).await?;

    Ok(())
}
