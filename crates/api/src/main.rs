use std::sync::Arc;

use anyhow::Context;

use clientele_api::app::{AppServices, build_app};
use clientele_infra::{CustomerStore, InMemoryCustomerStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    clientele_observability::init();

    let config = clientele_api::config::load()?;

    let customers: Arc<dyn CustomerStore> = Arc::new(InMemoryCustomerStore::new());
    let services = AppServices::from_config(&config, customers)?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
