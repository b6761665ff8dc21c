use pos_backend::{
    api::{ApiState, router::create_router},
    config::{database, seed, server::ServerConfig},
    core::auth,
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load server configuration
    let config = ServerConfig::from_env()
        .inspect_err(|e| error!("Invalid configuration: {}", e))?;
    let address = config.socket_address()?;

    // 4. Connect and create tables
    let db = database::create_connection(&config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed initial users and categories
    if config.seed_config.exists() {
        let seed_config = seed::load_seed_config(&config.seed_config)?;
        let summary = seed::apply_seed(&db, &seed_config)
            .await
            .inspect_err(|e| error!("Failed to apply seed data: {}", e))?;
        info!(
            users = summary.users_created,
            categories = summary.categories_created,
            "Seed data applied."
        );
    } else {
        warn!(path = %config.seed_config.display(), "Seed file not found, skipping.");
    }

    // 6. Drop sessions that expired while the server was down
    auth::purge_expired_sessions(&db, chrono::Utc::now()).await?;

    // 7. Serve
    let state = Arc::new(ApiState {
        database: db,
        session_ttl: config.session_ttl,
    });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(%address, "Listening.");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received.");
}
