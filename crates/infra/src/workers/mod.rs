//! Background workers.

pub mod reload_worker;

pub use reload_worker::{ReloadWorker, ReloadWorkerConfig, ReloadWorkerHandle};
