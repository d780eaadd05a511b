pub mod auth;
pub mod catalog;
pub mod domain;
pub mod evaluator;
pub mod latency;
pub mod memory;
pub mod ports;
pub mod simulator;
pub mod stats;
pub mod store;

pub use auth::AuthService;
pub use domain::{
    DailyEntry, FoodItem, HealthMetrics, KeyFactor, Recommendation, RiskAssessment, RiskStatus,
    Sex, Simulation, TimeOfDay, User, UserProfile,
};
pub use latency::Latency;
pub use memory::InMemoryStorage;
pub use ports::{Clock, FixedClock, KeyValueStore, PortError, PortResult, SystemClock};
pub use simulator::{RiskBand, SimulationOutcome};
pub use stats::DashboardSummary;
pub use store::SessionDataStore;
