use rewards::{app, config, initialize_state, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::setup_tracing();

    let mut state = initialize_state().await?;
    match telemetry::setup_metrics_recorder() {
        Ok(handle) => state.metrics = Some(handle),
        Err(err) => {
            tracing::warn!(error = %err, "prometheus recorder not installed")
        },
    }

    let address = state
        .config
        .address
        .clone()
        .unwrap_or_else(|| config::DEFAULT_ADDRESS.to_owned());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, version = state.config.version(), "server started");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
