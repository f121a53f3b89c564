use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use catalogd_observability::CatalogMetrics;

use crate::config::{DEFAULT_RELOAD_INTERVAL, DEFAULT_RELOAD_TIMEOUT};
use crate::loader::{CatalogSource, LoadError};
use crate::read_model::CatalogStore;

/// Reload worker configuration.
#[derive(Debug, Clone)]
pub struct ReloadWorkerConfig {
    /// Time between two reload ticks
    pub interval: Duration,
    /// Upper bound for one load attempt (directory scan + parsing)
    pub load_timeout: Duration,
    /// Name for logging
    pub name: String,
}

impl Default for ReloadWorkerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RELOAD_INTERVAL,
            load_timeout: DEFAULT_RELOAD_TIMEOUT,
            name: "catalog-reload".to_string(),
        }
    }
}

impl ReloadWorkerConfig {
    /// A zero interval falls back to the default; the tick timer needs a
    /// non-zero period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = if interval.is_zero() {
            DEFAULT_RELOAD_INTERVAL
        } else {
            interval
        };
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Handle to control and join a running reload worker.
#[derive(Debug)]
pub struct ReloadWorkerHandle {
    name: String,
    shutdown: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl ReloadWorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    ///
    /// A load already in flight finishes (bounded by the load timeout) before
    /// the loop exits.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(j) = self.join.take() {
            if let Err(e) = j.await {
                error!(worker = %self.name, error = %e, "catalog reload worker terminated abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for ReloadWorkerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Periodically reloads the catalog from a [`CatalogSource`] into a [`CatalogStore`].
///
/// Each tick runs `Idle -> Loading -> Idle`:
/// - success: the new list replaces the current snapshot
/// - failure or timeout: logged, the current snapshot keeps being served
///
/// There is no retry backoff; a failed tick just waits for the next one.
pub struct ReloadWorker<S> {
    source: Arc<S>,
    store: Arc<CatalogStore>,
    metrics: Arc<CatalogMetrics>,
    config: ReloadWorkerConfig,
}

impl<S> ReloadWorker<S>
where
    S: CatalogSource,
{
    pub fn new(
        source: S,
        store: Arc<CatalogStore>,
        metrics: Arc<CatalogMetrics>,
        config: ReloadWorkerConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            store,
            metrics,
            config,
        }
    }

    /// Run one load attempt right now and install the result on success.
    ///
    /// Returns the new store generation. On error the store is left untouched.
    pub async fn reload_now(&self) -> Result<u64, LoadError> {
        let result = self.load().await;
        self.metrics.record_reload(result.is_ok());

        let products = result?;
        let count = products.len();
        let generation = self.store.replace(products);
        info!(worker = %self.config.name, products = count, generation, "product catalog loaded");
        Ok(generation)
    }

    async fn load(&self) -> Result<Vec<catalogd_core::Product>, LoadError> {
        let source = self.source.clone();
        let task = tokio::task::spawn_blocking(move || source.load());

        // On timeout the blocking task is left to finish on its own; its result is dropped.
        match tokio::time::timeout(self.config.load_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(LoadError::Aborted(join_err.to_string())),
            Err(_) => Err(LoadError::TimedOut(self.config.load_timeout)),
        }
    }

    /// Spawn the tick loop on the current runtime.
    ///
    /// The first tick fires one full interval from now; callers are expected
    /// to have done the initial load themselves.
    pub fn spawn(self, shutdown: CancellationToken) -> ReloadWorkerHandle {
        let name = self.config.name.clone();
        let join = tokio::spawn(self.run(shutdown.clone()));
        ReloadWorkerHandle {
            name,
            shutdown,
            join: Some(join),
        }
    }

    async fn run(self, shutdown: CancellationToken) {
        let name = self.config.name.clone();
        info!(
            worker = %name,
            source = %self.source.describe(),
            interval_secs = self.config.interval.as_secs_f64(),
            "catalog reload worker started"
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    info!(worker = %name, "reloading product catalog");
                    if let Err(e) = self.reload_now().await {
                        error!(
                            worker = %name,
                            error = %e,
                            generation = self.store.snapshot().generation(),
                            "catalog reload failed; keeping previous catalog"
                        );
                    }
                }
            }
        }

        info!(worker = %name, "catalog reload worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};

    use catalogd_core::Product;
    use tempfile::TempDir;

    use crate::loader::DirectorySource;

    /// Source driven by a closure, for scripting failures.
    struct FnSource<F>(F);

    impl<F> CatalogSource for FnSource<F>
    where
        F: Fn() -> Result<Vec<Product>, LoadError> + Send + Sync + 'static,
    {
        fn load(&self) -> Result<Vec<Product>, LoadError> {
            (self.0)()
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn write_catalog(dir: &TempDir, file: &str, ids: &[&str]) {
        let products: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"id":"{id}","name":"P{id}","description":"product {id}","picture":"",
                        "priceUsd":{{"currencyCode":"USD","units":1,"nanos":0}},"categories":[]}}"#
                )
            })
            .collect();
        fs::write(dir.path().join(file), format!(r#"{{"products":[{}]}}"#, products.join(","))).unwrap();
    }

    fn fast_config() -> ReloadWorkerConfig {
        ReloadWorkerConfig::default()
            .with_interval(Duration::from_millis(20))
            .with_load_timeout(Duration::from_secs(2))
            .with_name("test-reload")
    }

    async fn wait_for_generation(store: &CatalogStore, at_least: u64) -> bool {
        for _ in 0..200 {
            if store.snapshot().generation() >= at_least {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    fn ids(store: &CatalogStore) -> Vec<String> {
        store
            .snapshot()
            .products()
            .iter()
            .map(|p| p.id().to_string())
            .collect()
    }

    #[tokio::test]
    async fn reload_now_installs_products() {
        catalogd_observability::tracing::init_for_tests();
        let dir = TempDir::new().unwrap();
        write_catalog(&dir, "a.json", &["1", "2"]);

        let store = Arc::new(CatalogStore::new());
        let metrics = Arc::new(CatalogMetrics::new());
        let worker = ReloadWorker::new(DirectorySource::new(dir.path()), store.clone(), metrics.clone(), fast_config());

        assert_eq!(worker.reload_now().await.unwrap(), 1);
        assert_eq!(ids(&store), vec!["1", "2"]);
        assert_eq!(metrics.snapshot().reload_success, 1);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        write_catalog(&dir, "a.json", &["1"]);

        let store = Arc::new(CatalogStore::new());
        let metrics = Arc::new(CatalogMetrics::new());
        let worker = ReloadWorker::new(DirectorySource::new(dir.path()), store.clone(), metrics.clone(), fast_config());
        worker.reload_now().await.unwrap();

        fs::write(dir.path().join("b.json"), "{ broken").unwrap();
        let err = worker.reload_now().await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "got {err:?}");

        let snap = store.snapshot();
        assert_eq!(snap.generation(), 1);
        assert_eq!(ids(&store), vec!["1"]);
        assert_eq!(metrics.snapshot().reload_failure, 1);
    }

    #[tokio::test]
    async fn slow_source_times_out_without_touching_store() {
        let source = FnSource(|| {
            std::thread::sleep(Duration::from_millis(300));
            Ok::<_, LoadError>(vec![Product::new("late", "Late", "arrives too late")])
        });
        let store = Arc::new(CatalogStore::with_products(vec![Product::new("1", "Mug", "Coffee mug")]));
        let config = fast_config().with_load_timeout(Duration::from_millis(20));
        let worker = ReloadWorker::new(source, store.clone(), Arc::new(CatalogMetrics::new()), config);

        let err = worker.reload_now().await.unwrap_err();
        assert!(matches!(err, LoadError::TimedOut(_)), "got {err:?}");
        assert_eq!(ids(&store), vec!["1"]);
    }

    #[tokio::test]
    async fn spawned_worker_picks_up_new_files() {
        let dir = TempDir::new().unwrap();
        write_catalog(&dir, "a.json", &["1"]);

        let store = Arc::new(CatalogStore::new());
        let worker = ReloadWorker::new(
            DirectorySource::new(dir.path()),
            store.clone(),
            Arc::new(CatalogMetrics::new()),
            fast_config(),
        );
        worker.reload_now().await.unwrap();
        let handle = worker.spawn(CancellationToken::new());

        write_catalog(&dir, "b.json", &["2"]);
        let mut seen = Vec::new();
        for _ in 0..200 {
            seen = ids(&store);
            if seen.len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(seen, vec!["1", "2"]);
        assert!(store.snapshot().generation() >= 2);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn failing_ticks_keep_serving_until_source_recovers() {
        let healthy = Arc::new(AtomicBool::new(false));
        let source = {
            let healthy = healthy.clone();
            FnSource(move || {
                if healthy.load(Ordering::SeqCst) {
                    Ok(vec![Product::new("2", "Fresh", "fresh catalog")])
                } else {
                    Err(LoadError::Aborted("disk on fire".to_string()))
                }
            })
        };

        let store = Arc::new(CatalogStore::with_products(vec![Product::new("1", "Stale", "old catalog")]));
        let metrics = Arc::new(CatalogMetrics::new());
        let handle = ReloadWorker::new(source, store.clone(), metrics.clone(), fast_config())
            .spawn(CancellationToken::new());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ids(&store), vec!["1"]);
        assert!(metrics.snapshot().reload_failure >= 1);

        healthy.store(true, Ordering::SeqCst);
        assert!(wait_for_generation(&store, 2).await, "worker never recovered");
        assert_eq!(ids(&store), vec!["2"]);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn cancelled_worker_stops_reloading() {
        let dir = TempDir::new().unwrap();
        write_catalog(&dir, "a.json", &["1"]);

        let store = Arc::new(CatalogStore::with_products(Vec::new()));
        let token = CancellationToken::new();
        let handle = ReloadWorker::new(
            DirectorySource::new(dir.path()),
            store.clone(),
            Arc::new(CatalogMetrics::new()),
            fast_config(),
        )
        .spawn(token.clone());

        assert!(wait_for_generation(&store, 2).await);
        token.cancel();
        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(handle.is_finished());

        let generation = store.snapshot().generation();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.snapshot().generation(), generation);
        handle.shutdown().await;
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let config = ReloadWorkerConfig::default().with_interval(Duration::ZERO);
        assert_eq!(config.interval, DEFAULT_RELOAD_INTERVAL);

        let config = config.with_interval(Duration::from_millis(20));
        assert_eq!(config.interval, Duration::from_millis(20));
    }

    #[tokio::test]
    async fn zero_interval_worker_runs_and_stops() {
        let store = Arc::new(CatalogStore::new());
        let handle = ReloadWorker::new(
            FnSource(|| Ok::<_, LoadError>(vec![Product::new("1", "A", "a")])),
            store.clone(),
            Arc::new(CatalogMetrics::new()),
            ReloadWorkerConfig::default().with_interval(Duration::ZERO),
        )
        .spawn(CancellationToken::new());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished(), "tick loop died on start");
        handle.shutdown().await;
        assert_eq!(store.snapshot().generation(), 0);
    }

    #[tokio::test]
    async fn shutdown_survives_a_panicked_worker() {
        catalogd_observability::tracing::init_for_tests();
        let handle = ReloadWorkerHandle {
            name: "test-reload".to_string(),
            shutdown: CancellationToken::new(),
            join: Some(tokio::spawn(async { panic!("reload loop blew up") })),
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
        handle.shutdown().await;
    }
}
