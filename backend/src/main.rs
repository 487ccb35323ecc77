use inventory_backend::config::AppConfig;
use inventory_backend::{create_router, initialize_backend};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    info!("Using storage preference '{}'", config.storage.backend);

    let app_state = initialize_backend(&config).await?;
    let product_service = app_state.product_service.clone();
    info!("Product storage ready ({})", product_service.backend_kind());

    let app = create_router(app_state, &config.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing product storage");
    if let Err(e) = product_service.close().await {
        error!("Failed to close product storage: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
