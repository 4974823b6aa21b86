use std::net::SocketAddr;
use std::sync::Arc;

use bus_predictor::config::ServeConfig;
use bus_predictor::{service, ModelStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServeConfig::from_env();
    let store = Arc::new(ModelStore::new(&config.models_dir));

    // A missing or partial models directory is not fatal: the service comes
    // up degraded and reports it through /health until a reload succeeds.
    if let Err(e) = store.reload() {
        tracing::error!(error = %e, "initial model load failed");
    }
    let status = store.status();
    tracing::info!(
        models_dir = %config.models_dir.display(),
        eta_model = status.eta_model,
        occupancy_model = status.occupancy_model,
        "model store initialized"
    );

    let app = service::router(store);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
