use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use catalogd_infra::flags::FAILURE_FLAG;
use catalogd_infra::{
    CatalogConfig, CatalogQueryEngine, CatalogStore, DirectorySource, FaultInjectionGate,
    InMemoryFlagProvider, LoadError, ReloadWorker, ReloadWorkerHandle,
};
use catalogd_observability::CatalogMetrics;

/// Everything request handlers need, shared behind one `Arc`.
#[derive(Debug)]
pub struct AppServices {
    engine: CatalogQueryEngine,
    flags: Arc<InMemoryFlagProvider>,
}

impl AppServices {
    pub fn new(engine: CatalogQueryEngine, flags: Arc<InMemoryFlagProvider>) -> Self {
        Self { engine, flags }
    }

    pub fn engine(&self) -> &CatalogQueryEngine {
        &self.engine
    }

    pub fn flags(&self) -> &InMemoryFlagProvider {
        &self.flags
    }
}

/// Running catalog: handler services plus the reload worker to stop on shutdown.
#[derive(Debug)]
pub struct CatalogRuntime {
    pub services: Arc<AppServices>,
    pub reload: ReloadWorkerHandle,
}

/// Load the catalog once, then start the periodic reload worker.
///
/// Fails when the initial load fails: the service must not start serving
/// without a catalog.
pub async fn build_services(
    config: &CatalogConfig,
    shutdown: CancellationToken,
) -> Result<CatalogRuntime, LoadError> {
    let store = Arc::new(CatalogStore::new());
    let metrics = Arc::new(CatalogMetrics::new());

    info!(dir = %config.catalog_dir.display(), "loading product catalog");
    let worker = ReloadWorker::new(
        DirectorySource::new(&config.catalog_dir),
        store.clone(),
        metrics.clone(),
        config.reload_worker_config(),
    );
    worker.reload_now().await?;

    info!(interval_secs = config.reload_interval.as_secs(), "product catalog reload interval");
    let reload = worker.spawn(shutdown);

    let flags = Arc::new(InMemoryFlagProvider::new().with_flag(FAILURE_FLAG, config.failure_flag_enabled));
    let gate = FaultInjectionGate::new(flags.clone())
        .with_sentinel(config.sentinel_id.clone())
        .with_timeout(config.flag_timeout);
    let engine = CatalogQueryEngine::new(store, gate, metrics);

    Ok(CatalogRuntime {
        services: Arc::new(AppServices::new(engine, flags)),
        reload,
    })
}
