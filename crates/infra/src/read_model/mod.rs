//! In-memory read model holding the currently served catalog.

pub mod catalog_store;

pub use catalog_store::{CatalogSnapshot, CatalogStore};
