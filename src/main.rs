use dotenvy::dotenv;
use wayfare::router::init_router;
use wayfare::state::init_app_state;
use wayfare_config::ServerConfig;
use wayfare_observability::{LogConfig, init_logging, init_metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging(&LogConfig::from_env());

    let server_config = ServerConfig::from_env();
    let metrics = if server_config.metrics_enabled {
        init_metrics()
    } else {
        None
    };

    let state = init_app_state(&server_config).await?.with_metrics(metrics);
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    tracing::info!(
        addr = %server_config.bind_addr,
        store = %server_config.store_backend,
        "Server listening"
    );
    tracing::info!("Scalar UI available at http://{}/scalar", server_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
