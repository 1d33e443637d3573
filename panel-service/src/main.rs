use panel_service::{
    build_router,
    config::{Environment, PanelConfig},
    services::{
        bootstrap::bootstrap_super_admin, metrics::init_metrics, InMemoryServerStore,
        InMemoryTaskStore, InMemoryUserStore, TokenService,
    },
    AppState,
};
use service_core::error::AppError;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = PanelConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting panel service"
    );

    let tokens = TokenService::new(&config.jwt)?;
    let users = Arc::new(InMemoryUserStore::new());

    if let Some(username) = &config.bootstrap_admin {
        let (_, token) = bootstrap_super_admin(users.as_ref(), &tokens, username).await?;
        if config.environment == Environment::Dev {
            tracing::info!(token = %token, "Bootstrap admin token (dev only)");
        }
    }

    let state = AppState {
        config: config.clone(),
        tokens,
        users,
        servers: Arc::new(InMemoryServerStore::new()),
        tasks: Arc::new(InMemoryTaskStore::new()),
    };

    let app = build_router(state);

    let address = config.common.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        AppError::InternalError(anyhow::anyhow!("Failed to bind to address {}: {}", address, e))
    })?;

    tracing::info!("Listening on {}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Panel service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
