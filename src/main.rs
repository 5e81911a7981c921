use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::error::Error;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pedidos_api::api::{self, AppState};
use pedidos_api::auth::BcryptHasher;
use pedidos_api::config::AppConfig;
use pedidos_api::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_logging(&config.logging);

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    let pool = match &config.database.url {
        Some(url) => Some(connect(url, config.database.max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            None
        }
    };

    let state = match &pool {
        Some(pool) => AppState::with_postgres(
            pool.clone(),
            &config.auth.jwt_secret,
            config.auth.token_ttl_hours,
        ),
        None => AppState::with_memory_store(
            Arc::new(BcryptHasher::default()),
            &config.auth.jwt_secret,
            config.auth.token_ttl_hours,
        ),
    };

    if let Some(email) = &config.auth.bootstrap_admin_email {
        match state.users.promote_by_email(email).await {
            Ok(true) => tracing::info!(email = %email, "Bootstrap administrator ready"),
            Ok(false) => tracing::warn!(
                email = %email,
                "Bootstrap administrator is not registered yet"
            ),
            Err(e) => tracing::error!(error = %e, "Failed to promote bootstrap administrator"),
        }
    }

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr).await?;
    tracing::info!("Server listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}

async fn connect(url: &str, max_connections: u32) -> Result<PgPool, Box<dyn Error>> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database connected and migrated");

    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
