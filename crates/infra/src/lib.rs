//! Infrastructure layer: catalog files, the in-memory store, the reload
//! worker, feature flags and the query engine on top of them.

pub mod config;
pub mod flags;
pub mod loader;
pub mod query;
pub mod read_model;
pub mod workers;

pub use config::{CatalogConfig, ConfigError};
pub use flags::{FaultInjectionGate, FlagError, FlagProvider, InMemoryFlagProvider};
pub use loader::{CatalogSource, DirectorySource, LoadError, load_catalog};
pub use query::CatalogQueryEngine;
pub use read_model::{CatalogSnapshot, CatalogStore};
pub use workers::{ReloadWorker, ReloadWorkerConfig, ReloadWorkerHandle};
