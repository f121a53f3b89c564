use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use catalogd_core::ProductId;

use super::provider::FlagProvider;

/// The only product id eligible for injected lookup failures.
pub const DEFAULT_SENTINEL_ID: &str = "OLJCESPC7Z";

/// Flag consulted for the sentinel id; evaluated with default `false`.
pub const FAILURE_FLAG: &str = "productCatalogFailure";

/// Upper bound on a single flag evaluation.
pub const DEFAULT_FLAG_TIMEOUT: Duration = Duration::from_millis(250);

/// Decides whether a lookup must be failed on purpose.
///
/// - Non-sentinel ids never reach the provider.
/// - Every sentinel lookup re-evaluates the flag (no caching).
/// - Provider errors and timeouts count as "do not fail".
#[derive(Clone)]
pub struct FaultInjectionGate {
    sentinel: ProductId,
    flag: String,
    timeout: Duration,
    provider: Arc<dyn FlagProvider>,
}

impl FaultInjectionGate {
    pub fn new(provider: Arc<dyn FlagProvider>) -> Self {
        Self {
            sentinel: ProductId::from(DEFAULT_SENTINEL_ID),
            flag: FAILURE_FLAG.to_string(),
            timeout: DEFAULT_FLAG_TIMEOUT,
            provider,
        }
    }

    pub fn with_sentinel(mut self, id: impl Into<ProductId>) -> Self {
        self.sentinel = id.into();
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = flag.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn sentinel(&self) -> &ProductId {
        &self.sentinel
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn is_eligible(&self, id: &str) -> bool {
        self.sentinel == id
    }

    pub async fn should_fail(&self, id: &str) -> bool {
        if !self.is_eligible(id) {
            return false;
        }

        let decision = self.provider.boolean_value(&self.flag, false);
        match tokio::time::timeout(self.timeout, decision).await {
            Ok(Ok(enabled)) => enabled,
            Ok(Err(e)) => {
                warn!(flag = %self.flag, error = %e, "flag evaluation failed; not injecting fault");
                false
            }
            Err(_) => {
                warn!(flag = %self.flag, timeout_ms = self.timeout.as_millis() as u64, "flag evaluation timed out; not injecting fault");
                false
            }
        }
    }
}

impl core::fmt::Debug for FaultInjectionGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FaultInjectionGate")
            .field("sentinel", &self.sentinel)
            .field("flag", &self.flag)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
