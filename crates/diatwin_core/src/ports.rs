//! crates/diatwin_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to stay independent of the concrete storage backend and of the wall clock.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the storage backends.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Failed to serialize {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Keys
//=========================================================================================

/// The fixed keys of the durable key space.
pub mod keys {
    pub const USER: &str = "user";
    pub const USER_PROFILE: &str = "userProfile";
    pub const RISK_ASSESSMENT: &str = "riskAssessment";
    pub const DAILY_ENTRIES: &str = "dailyEntries";

    pub const ALL: [&str; 4] = [USER, USER_PROFILE, RISK_ASSESSMENT, DAILY_ENTRIES];
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A flat string key space holding JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    /// Stores `value` under `key`, replacing anything already there.
    async fn set(&self, key: &str, value: String) -> PortResult<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;

    /// Lists every key currently stored, sorted.
    async fn keys(&self) -> PortResult<Vec<String>>;
}

/// Supplies the calendar date that "today's" entry is filed under.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Uses the UTC calendar date of the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
