//! Catalog queries: list, get-by-id and search.
//!
//! Every query takes one snapshot up front and works on it exclusively, so a
//! reload landing mid-query never mixes two catalogs in one answer.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use catalogd_core::{Product, QueryError, QueryResult, SearchQuery};
use catalogd_observability::{CatalogMetrics, QueryKind};

use crate::flags::FaultInjectionGate;
use crate::read_model::{CatalogSnapshot, CatalogStore};

#[derive(Debug, Clone)]
pub struct CatalogQueryEngine {
    store: Arc<CatalogStore>,
    gate: FaultInjectionGate,
    metrics: Arc<CatalogMetrics>,
}

impl CatalogQueryEngine {
    pub fn new(store: Arc<CatalogStore>, gate: FaultInjectionGate, metrics: Arc<CatalogMetrics>) -> Self {
        Self { store, gate, metrics }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<CatalogMetrics> {
        &self.metrics
    }

    /// The whole current catalog, in snapshot order.
    pub fn list(&self) -> Arc<CatalogSnapshot> {
        let started = Instant::now();
        let snapshot = self.store.snapshot();
        self.metrics.record_query(QueryKind::List, started.elapsed());
        snapshot
    }

    /// First product whose id equals `id`.
    ///
    /// The fault-injection gate is consulted before the scan; an injected
    /// fault wins even if the product exists.
    pub async fn get_by_id(&self, id: &str) -> QueryResult<Product> {
        let started = Instant::now();
        let result = self.lookup(id).await;
        self.metrics.record_query(QueryKind::Get, started.elapsed());

        match &result {
            Ok(product) => debug!(product.id = %id, product.name = product.name(), "product found"),
            Err(QueryError::InjectedFault) => {
                self.metrics.record_injected_fault();
                warn!(product.id = %id, flag = self.gate.flag(), "product catalog failure flag enabled");
            }
            Err(QueryError::NotFound(_)) => {
                self.metrics.record_not_found();
                debug!(product.id = %id, "product not found");
            }
        }

        result
    }

    async fn lookup(&self, id: &str) -> QueryResult<Product> {
        if self.gate.should_fail(id).await {
            return Err(QueryError::InjectedFault);
        }

        self.store
            .snapshot()
            .find(id)
            .cloned()
            .ok_or_else(|| QueryError::not_found(id))
    }

    /// Every product whose name or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let started = Instant::now();
        let snapshot = self.store.snapshot();
        let results = SearchQuery::new(query).filter(snapshot.products());

        self.metrics.record_query(QueryKind::Search, started.elapsed());
        self.metrics.record_search_results(results.len());
        debug!(query, results = results.len(), "searched products");

        results
    }
}
