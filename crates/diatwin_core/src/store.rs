//! crates/diatwin_core/src/store.rs
//!
//! The session data store: owns the signed-in user's profile, assessment,
//! daily log and last simulation, and mirrors them into the key-value port.

use crate::domain::{
    DailyEntry, FoodItem, HealthMetrics, RiskAssessment, Simulation, User, UserProfile,
};
use crate::evaluator;
use crate::latency::{pause, Latency};
use crate::ports::{keys, Clock, KeyValueStore, PortError, PortResult};
use crate::simulator::{self, DEFAULT_BASELINE_RISK};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Reads a JSON document from storage. A value that no longer parses is
/// reported and treated as absent.
pub(crate) async fn load_json<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> PortResult<Option<T>> {
    let Some(raw) = storage.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "Ignoring unreadable stored value.");
            Ok(None)
        }
    }
}

fn to_raw<T: Serialize>(key: &str, value: &T) -> PortResult<String> {
    serde_json::to_string(value).map_err(|source| PortError::Serialization {
        key: key.to_string(),
        source,
    })
}

pub(crate) async fn store_json<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> PortResult<()> {
    storage.set(key, to_raw(key, value)?).await
}

/// Writes several keys as one unit. If any write fails, the keys already
/// written get their previous values back (or are removed if they had none)
/// and the original error is returned.
async fn store_all(storage: &dyn KeyValueStore, writes: Vec<(&str, String)>) -> PortResult<()> {
    let mut written: Vec<(&str, Option<String>)> = Vec::with_capacity(writes.len());
    for (key, raw) in writes {
        let result = match storage.get(key).await {
            Ok(previous) => storage.set(key, raw).await.map(|()| previous),
            Err(e) => Err(e),
        };
        match result {
            Ok(previous) => written.push((key, previous)),
            Err(e) => {
                warn!(key, error = %e, "Write failed, restoring earlier keys.");
                restore(storage, written).await;
                return Err(e);
            }
        }
    }
    Ok(())
}

async fn restore(storage: &dyn KeyValueStore, written: Vec<(&str, Option<String>)>) {
    for (key, previous) in written.into_iter().rev() {
        let result = match previous {
            Some(raw) => storage.set(key, raw).await,
            None => storage.remove(key).await,
        };
        if let Err(e) = result {
            warn!(key, error = %e, "Could not restore stored value.");
        }
    }
}

//=========================================================================================
// Session State
//=========================================================================================

#[derive(Debug, Default)]
struct SessionData {
    user: Option<User>,
    profile: Option<UserProfile>,
    assessment: Option<RiskAssessment>,
    entries: Vec<DailyEntry>,
    simulation: Option<Simulation>,
}

/// Decrements the in-flight counter when an operation finishes, however it ends.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

//=========================================================================================
// SessionDataStore
//=========================================================================================

pub struct SessionDataStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    latency: Latency,
    state: Mutex<SessionData>,
    in_flight: AtomicUsize,
}

impl SessionDataStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self {
            storage,
            clock,
            latency,
            state: Mutex::new(SessionData::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    //--- Lifecycle -----------------------------------------------------------------------

    /// Starts a session for `user`, replacing whatever was held before, and
    /// reloads the stored profile, assessment and daily log.
    pub async fn open(&self, user: User) -> PortResult<()> {
        let storage = self.storage.as_ref();
        let profile = load_json::<UserProfile>(storage, keys::USER_PROFILE).await?;
        let assessment = load_json::<RiskAssessment>(storage, keys::RISK_ASSESSMENT).await?;
        let entries = load_json::<Vec<DailyEntry>>(storage, keys::DAILY_ENTRIES)
            .await?
            .unwrap_or_default();

        info!(
            user_id = %user.id,
            has_profile = profile.is_some(),
            entries = entries.len(),
            "Session opened."
        );

        let mut state = self.state.lock().await;
        *state = SessionData {
            user: Some(user),
            profile,
            assessment,
            entries,
            simulation: None,
        };
        Ok(())
    }

    /// Ends the session. In-memory state is dropped; storage is left as is.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.user.as_ref() {
            info!(user_id = %user.id, "Session closed.");
        }
        *state = SessionData::default();
    }

    //--- Mutations -----------------------------------------------------------------------

    /// Replaces the profile, re-evaluates risk and persists both. Marks the
    /// open user's profile as complete.
    pub async fn save_profile(&self, profile: UserProfile) -> PortResult<RiskAssessment> {
        let _busy = InFlight::start(&self.in_flight);
        pause(self.latency.save_profile).await;

        let assessment = evaluator::evaluate(&profile);
        let storage = self.storage.as_ref();

        let mut state = self.state.lock().await;
        let completed = state.user.as_ref().map(|user| User {
            profile_complete: true,
            ..user.clone()
        });

        let mut writes = vec![
            (keys::USER_PROFILE, to_raw(keys::USER_PROFILE, &profile)?),
            (keys::RISK_ASSESSMENT, to_raw(keys::RISK_ASSESSMENT, &assessment)?),
        ];
        if let Some(completed) = completed.as_ref() {
            writes.push((keys::USER, to_raw(keys::USER, completed)?));
        }
        store_all(storage, writes).await?;

        if completed.is_some() {
            state.user = completed;
        }

        info!(
            status = %assessment.status,
            risk_level = assessment.risk_level,
            "Profile saved and risk re-evaluated."
        );
        state.profile = Some(profile);
        state.assessment = Some(assessment.clone());
        Ok(assessment)
    }

    /// Merges `metrics` into today's entry, creating the entry if needed.
    pub async fn update_health_metrics(&self, metrics: HealthMetrics) -> PortResult<DailyEntry> {
        let _busy = InFlight::start(&self.in_flight);
        pause(self.latency.update_metrics).await;

        self.upsert_today(|entry| entry.health_metrics.merge(&metrics))
            .await
    }

    /// Appends `food` to today's entry, creating the entry if needed.
    pub async fn add_food_item(&self, food: FoodItem) -> PortResult<DailyEntry> {
        let _busy = InFlight::start(&self.in_flight);
        pause(self.latency.add_food).await;

        debug!(food = %food.name, time_of_day = ?food.time_of_day, "Logging food.");
        self.upsert_today(move |entry| entry.meals.push(food)).await
    }

    /// Simulates `foods` against the current baseline and keeps the result as
    /// the session's current simulation.
    pub async fn run_simulation(&self, foods: Vec<FoodItem>) -> Simulation {
        let _busy = InFlight::start(&self.in_flight);
        pause(self.latency.simulation).await;

        let mut state = self.state.lock().await;
        let baseline = baseline_of(state.assessment.as_ref());
        let simulation = simulator::simulate(&foods, baseline);

        info!(
            foods = foods.len(),
            baseline,
            resulting_risk = simulation.resulting_risk,
            "Simulation complete."
        );
        state.simulation = Some(simulation.clone());
        simulation
    }

    async fn upsert_today<F>(&self, apply: F) -> PortResult<DailyEntry>
    where
        F: FnOnce(&mut DailyEntry),
    {
        let today = self.clock.today();
        let mut state = self.state.lock().await;

        let mut entries = state.entries.clone();
        let index = match entries.iter().position(|entry| entry.date == today) {
            Some(index) => index,
            None => {
                let risk_level = state.assessment.as_ref().map_or(0, |a| a.risk_level);
                debug!(%today, risk_level, "Starting a new daily entry.");
                entries.push(DailyEntry::new(today, risk_level));
                entries.len() - 1
            }
        };
        apply(&mut entries[index]);
        let updated = entries[index].clone();

        store_json(self.storage.as_ref(), keys::DAILY_ENTRIES, &entries).await?;
        state.entries = entries;
        Ok(updated)
    }

    //--- Accessors -----------------------------------------------------------------------

    pub async fn user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.state.lock().await.profile.clone()
    }

    pub async fn risk_assessment(&self) -> Option<RiskAssessment> {
        self.state.lock().await.assessment.clone()
    }

    pub async fn daily_entries(&self) -> Vec<DailyEntry> {
        self.state.lock().await.entries.clone()
    }

    pub async fn current_simulation(&self) -> Option<Simulation> {
        self.state.lock().await.simulation.clone()
    }

    pub async fn today_entry(&self) -> Option<DailyEntry> {
        let today = self.clock.today();
        self.state
            .lock()
            .await
            .entries
            .iter()
            .find(|entry| entry.date == today)
            .cloned()
    }

    /// The risk a simulation starts from.
    pub async fn baseline_risk(&self) -> f64 {
        baseline_of(self.state.lock().await.assessment.as_ref())
    }

    /// True while any mutating operation is still running.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

fn baseline_of(assessment: Option<&RiskAssessment>) -> f64 {
    assessment.map_or(DEFAULT_BASELINE_RISK, |a| f64::from(a.risk_level))
}
