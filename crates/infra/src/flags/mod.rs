//! Feature-flag decisions and the fault-injection gate built on them.
//!
//! The flag backend itself lives outside this crate; the catalog only asks it
//! for boolean decisions through [`FlagProvider`].

pub mod gate;
pub mod provider;

pub use gate::{DEFAULT_FLAG_TIMEOUT, DEFAULT_SENTINEL_ID, FAILURE_FLAG, FaultInjectionGate};
pub use provider::{FlagError, FlagProvider, InMemoryFlagProvider};
