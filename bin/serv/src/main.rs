use rps_api::{
    config::ApiConfig, metrics::init_metrics, middleware::cors::create_cors_layer,
    state::ApiState, tracing::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(&config.env);

    let metrics_handle = if config.metrics_enabled {
        Some(init_metrics()?)
    } else {
        None
    };

    let state = ApiState::new(&config, metrics_handle)?;

    let app = rps_api::router::router()
        .with_state(state)
        .layer(create_cors_layer(&config.origins()));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
