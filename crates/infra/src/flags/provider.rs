use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    #[error("flag provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of boolean feature-flag decisions.
#[async_trait]
pub trait FlagProvider: Send + Sync + 'static {
    /// Evaluate `flag`, returning `default` when the provider has no opinion.
    async fn boolean_value(&self, flag: &str, default: bool) -> Result<bool, FlagError>;
}

#[async_trait]
impl<P> FlagProvider for Arc<P>
where
    P: FlagProvider + ?Sized,
{
    async fn boolean_value(&self, flag: &str, default: bool) -> Result<bool, FlagError> {
        (**self).boolean_value(flag, default).await
    }
}

/// Process-local flag table.
///
/// Stands in for a remote flag service: values are set at startup from
/// configuration or flipped at runtime through the admin route. Unknown flags
/// evaluate to the caller's default.
#[derive(Debug, Default)]
pub struct InMemoryFlagProvider {
    flags: RwLock<HashMap<String, bool>>,
}

impl InMemoryFlagProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(self, flag: impl Into<String>, enabled: bool) -> Self {
        self.set(flag, enabled);
        self
    }

    pub fn set(&self, flag: impl Into<String>, enabled: bool) {
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(flag.into(), enabled);
    }

    pub fn get(&self, flag: &str) -> Option<bool> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(flag)
            .copied()
    }
}

#[async_trait]
impl FlagProvider for InMemoryFlagProvider {
    async fn boolean_value(&self, flag: &str, default: bool) -> Result<bool, FlagError> {
        Ok(self.get(flag).unwrap_or(default))
    }
}
