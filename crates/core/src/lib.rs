//! `catalogd-core`: catalog domain building blocks.
//!
//! This crate contains **pure domain** types: the product value object, its
//! identifier, the query error model and the substring matcher used by search.
//! No IO, no locking, no async.

pub mod error;
pub mod id;
pub mod product;
pub mod search;

pub use error::{QueryError, QueryResult};
pub use id::ProductId;
pub use product::{Money, Product};
pub use search::SearchQuery;
