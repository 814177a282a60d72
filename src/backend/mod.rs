//! Simulated backend round-trips.
//!
//! Nothing here talks to a network. Stores call [`MockBackend::round_trip`]
//! where a real client would await an HTTP response, and read time through
//! the injectable [`Clock`] so tests can run without sleeping.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Config;

/// Artificial delay applied before a store action mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    #[default]
    None,
    Fixed(Duration),
}

impl Latency {
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::None
        } else {
            Self::Fixed(Duration::from_millis(ms))
        }
    }

    pub async fn wait(self) {
        if let Self::Fixed(delay) = self {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Clock + latency + id minting shared by the feature stores.
#[derive(Clone)]
pub struct MockBackend {
    clock: Arc<dyn Clock>,
    latency: Latency,
    current_user: String,
}

impl MockBackend {
    pub fn new(clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self {
            clock,
            latency,
            current_user: "current-user".to_string(),
        }
    }

    /// Immediate backend on the system clock. Used by tests and the CLI.
    pub fn instant() -> Self {
        Self::new(Arc::new(SystemClock), Latency::None)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Latency::from_millis(config.defaults.latency_ms),
        )
        .with_user(config.defaults.current_user.clone())
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = user.into();
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// Await the simulated network delay.
    pub async fn round_trip(&self) {
        self.latency.wait().await;
    }

    /// Fresh identifier of the form `{prefix}-{uuid}`.
    pub fn mint_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_millis_means_no_latency() {
        assert_eq!(Latency::from_millis(0), Latency::None);
        assert_eq!(
            Latency::from_millis(250),
            Latency::Fixed(Duration::from_millis(250))
        );
    }

    #[test]
    fn minted_ids_are_prefixed_and_unique() {
        let backend = MockBackend::instant();
        let a = backend.mint_id("test");
        let b = backend.mint_id("test");
        assert!(a.starts_with("test-"));
        assert_ne!(a, b);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_latency_sleeps() {
        let start = tokio::time::Instant::now();
        Latency::Fixed(Duration::from_millis(500)).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
