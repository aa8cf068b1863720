use std::sync::Arc;
use std::time::Duration;

use auth::AuthorizationGate;
use auth::HashingParams;
use auth::PasswordHasher;
use auth::TokenAuthority;
use auth_service::config::Config;
use auth_service::domain::account::service::UserService;
use auth_service::domain::auth::ports::AuthServicePort;
use auth_service::domain::auth::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::events::producer::KafkaEventProducer;
use auth_service::outbound::repositories::role::PostgresRoleRepository;
use auth_service::outbound::repositories::session::PostgresSessionRepository;
use auth_service::outbound::repositories::user::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        issuer = %config.jwt.issuer,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_params(HashingParams::new(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    ))?;
    let token_authority = Arc::new(TokenAuthority::new(
        config.jwt.access_secret.as_bytes(),
        config.jwt.refresh_secret.as_bytes(),
        &config.jwt.issuer,
        &config.jwt.audience,
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pg_pool.clone()));
    let session_repository = Arc::new(PostgresSessionRepository::new(pg_pool));
    let event_producer = Arc::new(KafkaEventProducer::new(&config.kafka)?);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&role_repository),
        Arc::clone(&session_repository),
        Arc::clone(&event_producer),
        Arc::clone(&token_authority),
        password_hasher,
        config.auth_settings(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repository,
        role_repository,
        session_repository,
        event_producer,
    ));
    let gate = Arc::new(AuthorizationGate::new(token_authority));

    let sweep_interval = Duration::from_secs(config.auth.session_cleanup_interval_seconds.max(1));
    let sweeper = Arc::clone(&auth_service);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = sweeper.purge_expired_sessions().await {
                tracing::error!(error = %e, "Expired session sweep failed");
            }
        }
    });
    tracing::info!(
        interval_seconds = sweep_interval.as_secs(),
        "Expired session sweep scheduled"
    );

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
        user_service,
        gate,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
