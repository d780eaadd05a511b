//! crates/diatwin_core/src/latency.rs
//!
//! Artificial delays standing in for the round trips a real backend would add.

use std::time::Duration;

/// How long each mocked operation waits before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub save_profile: Duration,
    pub update_metrics: Duration,
    pub add_food: Duration,
    pub simulation: Duration,
    pub sign_in: Duration,
    pub sign_out: Duration,
}

impl Latency {
    /// No waiting at all. What tests use.
    pub const fn none() -> Self {
        Self {
            save_profile: Duration::ZERO,
            update_metrics: Duration::ZERO,
            add_food: Duration::ZERO,
            simulation: Duration::ZERO,
            sign_in: Duration::ZERO,
            sign_out: Duration::ZERO,
        }
    }

    /// The delays the product was demoed with.
    pub const fn reference() -> Self {
        Self {
            save_profile: Duration::from_millis(1500),
            update_metrics: Duration::from_millis(1000),
            add_food: Duration::from_millis(1000),
            simulation: Duration::from_millis(2000),
            sign_in: Duration::from_millis(1000),
            sign_out: Duration::from_millis(500),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::none()
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
