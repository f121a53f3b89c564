use anyhow::Context;
use tokio_util::sync::CancellationToken;

use catalogd_api::app::{self, services};
use catalogd_api::shutdown::{ShutdownSignal, shutdown_on_signal};
use catalogd_infra::CatalogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalogd_observability::init();

    let config = CatalogConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;

    let signal = ShutdownSignal::install().context("failed to install signal handlers")?;
    let shutdown = CancellationToken::new();
    let runtime = services::build_services(&config, shutdown.clone())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "initial catalog load failed"))
        .context("failed to load product catalog")?;

    let app = app::build_app(runtime.services.clone());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on_signal(signal, shutdown))
        .await
        .context("server error")?;

    runtime.reload.shutdown().await;
    tracing::info!("product catalog stopped");
    Ok(())
}
