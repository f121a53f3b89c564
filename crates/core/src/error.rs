//! Query error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type returned by catalog lookups.
pub type QueryResult<T> = Result<T, QueryError>;

/// Failure of a catalog query.
///
/// Only lookups by id can fail. Listing and searching always succeed, with an
/// empty result in the worst case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The requested id is absent from the current snapshot.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The lookup was failed on purpose by the fault-injection flag.
    #[error("product catalog failure flag enabled")]
    InjectedFault,
}

impl QueryError {
    pub fn not_found(id: impl Into<ProductId>) -> Self {
        Self::NotFound(id.into())
    }

    /// True for deliberate, flag-driven failures (as opposed to real misses).
    pub fn is_injected(&self) -> bool {
        matches!(self, Self::InjectedFault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = QueryError::not_found("99");
        assert_eq!(err.to_string(), "product not found: 99");
        assert!(!err.is_injected());
    }

    #[test]
    fn injected_fault_is_flagged() {
        assert!(QueryError::InjectedFault.is_injected());
    }
}
