use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use discussion_service::adapters::auth::JwtTokenValidator;
use discussion_service::adapters::http::build_router;
use discussion_service::adapters::postgres::{
    connect_lazy, run_migrations, PostgresUnitOfWorkFactory,
};
use discussion_service::config::{AppConfig, LogFormat, ServerConfig};

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        database = %config.database.redacted_url(),
        "Starting discussion service"
    );

    let pool = connect_lazy(&config.database)?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let uow_factory = Arc::new(PostgresUnitOfWorkFactory::new(pool));
    let validator = Arc::new(JwtTokenValidator::new(&config.jwt)?);
    let app = build_router(uow_factory, validator, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
