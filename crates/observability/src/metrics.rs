//! Catalog counters.
//!
//! Every handle lives in one `CatalogMetrics` created at startup and shared by
//! reference; request paths only bump atomics, they never look counters up by
//! name.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// The three query operations the catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    List,
    Get,
    Search,
}

#[derive(Debug, Default)]
struct QueryCounters {
    count: AtomicU64,
    total_micros: AtomicU64,
}

impl QueryCounters {
    fn record(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_micros.fetch_add(micros, Ordering::Relaxed);
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn total_micros(&self) -> u64 {
        self.total_micros.load(Ordering::Relaxed)
    }
}

/// Process-wide catalog counters.
#[derive(Debug, Default)]
pub struct CatalogMetrics {
    list: QueryCounters,
    get: QueryCounters,
    search: QueryCounters,
    get_not_found: AtomicU64,
    injected_faults: AtomicU64,
    search_results: AtomicU64,
    reload_success: AtomicU64,
    reload_failure: AtomicU64,
}

impl CatalogMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, kind: QueryKind) -> &QueryCounters {
        match kind {
            QueryKind::List => &self.list,
            QueryKind::Get => &self.get,
            QueryKind::Search => &self.search,
        }
    }

    /// Count one completed query and add its duration.
    pub fn record_query(&self, kind: QueryKind, elapsed: Duration) {
        self.counters(kind).record(elapsed);
    }

    pub fn record_not_found(&self) {
        self.get_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_injected_fault(&self) {
        self.injected_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_results(&self, results: usize) {
        self.search_results
            .fetch_add(results as u64, Ordering::Relaxed);
    }

    pub fn record_reload(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.reload_success
        } else {
            &self.reload_failure
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let get_not_found = self.get_not_found.load(Ordering::Relaxed);
        let injected_faults = self.injected_faults.load(Ordering::Relaxed);

        MetricsSnapshot {
            list_products_count: self.list.count(),
            list_products_duration_us: self.list.total_micros(),
            get_product_count: self.get.count(),
            get_product_duration_us: self.get.total_micros(),
            get_product_not_found: get_not_found,
            get_product_injected_faults: injected_faults,
            search_products_count: self.search.count(),
            search_products_duration_us: self.search.total_micros(),
            search_products_results: self.search_results.load(Ordering::Relaxed),
            errors_total: get_not_found + injected_faults,
            reload_success: self.reload_success.load(Ordering::Relaxed),
            reload_failure: self.reload_failure.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`CatalogMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub list_products_count: u64,
    pub list_products_duration_us: u64,
    pub get_product_count: u64,
    pub get_product_duration_us: u64,
    pub get_product_not_found: u64,
    pub get_product_injected_faults: u64,
    pub search_products_count: u64,
    pub search_products_duration_us: u64,
    pub search_products_results: u64,
    pub errors_total: u64,
    pub reload_success: u64,
    pub reload_failure: u64,
}
