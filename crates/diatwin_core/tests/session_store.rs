use async_trait::async_trait;
use chrono::NaiveDate;
use diatwin_core::ports::keys;
use diatwin_core::{
    catalog, Clock, DailyEntry, FixedClock, HealthMetrics, InMemoryStorage, KeyValueStore,
    Latency, PortError, PortResult, RiskStatus, SessionDataStore, TimeOfDay, User, UserProfile,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

fn user() -> User {
    User {
        id: "123".to_string(),
        email: "pat@example.com".to_string(),
        name: Some("Pat".to_string()),
        profile_complete: false,
    }
}

fn store_with(storage: Arc<InMemoryStorage>) -> SessionDataStore {
    SessionDataStore::new(storage, Arc::new(FixedClock(today())), Latency::none())
}

/// A clock the test can move forward between operations.
struct SteppingClock(Mutex<NaiveDate>);

impl SteppingClock {
    fn advance(&self, days: i64) {
        let mut date = self.0.lock().expect("clock lock");
        *date += chrono::Duration::days(days);
    }
}

impl Clock for SteppingClock {
    fn today(&self) -> NaiveDate {
        *self.0.lock().expect("clock lock")
    }
}

async fn stored_json(storage: &InMemoryStorage, key: &str) -> serde_json::Value {
    let raw = storage
        .get(key)
        .await
        .expect("storage readable")
        .unwrap_or_else(|| panic!("{key} should be stored"));
    serde_json::from_str(&raw).expect("stored value is json")
}

#[tokio::test]
async fn save_profile_evaluates_persists_and_completes_user() {
    let storage = Arc::new(InMemoryStorage::new());
    let store = store_with(storage.clone());
    store.open(user()).await.expect("open");

    let assessment = store
        .save_profile(UserProfile {
            high_bp: true,
            high_chol: true,
            ..UserProfile::default()
        })
        .await
        .expect("save profile");

    assert_eq!(assessment.status, RiskStatus::Diabetic);
    assert_eq!(assessment.risk_level, 75);
    assert_eq!(store.risk_assessment().await, Some(assessment));
    assert!(store.user().await.expect("user").profile_complete);

    let stored_user = stored_json(&storage, keys::USER).await;
    assert_eq!(stored_user["profileComplete"], true);
    let stored_profile = stored_json(&storage, keys::USER_PROFILE).await;
    assert_eq!(stored_profile["highBP"], true);
    let stored_assessment = stored_json(&storage, keys::RISK_ASSESSMENT).await;
    assert_eq!(stored_assessment["status"], "diabetic");
    assert_eq!(stored_assessment["keyFactors"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn saving_again_replaces_the_assessment() {
    let store = store_with(Arc::new(InMemoryStorage::new()));
    store
        .save_profile(UserProfile {
            high_bp: true,
            high_chol: true,
            phys_activity: false,
            bmi: 31.0,
            ..UserProfile::default()
        })
        .await
        .expect("first save");

    let second = store
        .save_profile(UserProfile::default())
        .await
        .expect("second save");

    assert_eq!(second.status, RiskStatus::NonDiabetic);
    assert_eq!(second.risk_level, 25);
    let impacts: Vec<i32> = second.key_factors.iter().map(|f| f.impact).collect();
    assert_eq!(impacts, vec![0, 0, -15, 0]);
    assert_eq!(store.profile().await, Some(UserProfile::default()));
}

#[tokio::test]
async fn save_profile_without_a_session_leaves_user_key_alone() {
    let storage = Arc::new(InMemoryStorage::new());
    let store = store_with(storage.clone());
    store
        .save_profile(UserProfile::default())
        .await
        .expect("save profile");

    assert_eq!(storage.get(keys::USER).await.expect("get"), None);
    assert!(storage.get(keys::USER_PROFILE).await.expect("get").is_some());
}

#[tokio::test]
async fn food_and_metrics_share_one_entry_per_day() {
    let storage = Arc::new(InMemoryStorage::new());
    let store = store_with(storage.clone());
    store.open(user()).await.expect("open");
    store
        .save_profile(UserProfile {
            high_chol: true,
            ..UserProfile::default()
        })
        .await
        .expect("save profile");

    let apple = catalog::find_by_name("Apple").expect("apple");
    let pizza = catalog::find_by_name("Pizza").expect("pizza");
    store
        .add_food_item(apple.to_food_item(TimeOfDay::Breakfast))
        .await
        .expect("log apple");
    store
        .update_health_metrics(HealthMetrics {
            weight: Some(81.0),
            blood_pressure_systolic: Some(131.0),
            ..HealthMetrics::default()
        })
        .await
        .expect("log metrics");
    store
        .update_health_metrics(HealthMetrics {
            weight: Some(80.2),
            ..HealthMetrics::default()
        })
        .await
        .expect("log metrics again");
    let entry = store
        .add_food_item(pizza.to_food_item(TimeOfDay::Dinner))
        .await
        .expect("log pizza");

    assert_eq!(entry.date, today());
    assert_eq!(entry.risk_level, 45);
    let names: Vec<&str> = entry.meals.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "Pizza"]);
    assert_eq!(entry.health_metrics.weight, Some(80.2));
    assert_eq!(entry.health_metrics.blood_pressure_systolic, Some(131.0));

    assert_eq!(store.daily_entries().await.len(), 1);
    assert_eq!(store.today_entry().await, Some(entry));

    let stored = stored_json(&storage, keys::DAILY_ENTRIES).await;
    let stored = stored.as_array().expect("entries array");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["date"], "2026-10-18");
    assert_eq!(stored[0]["healthMetrics"]["weight"], 80.2);
}

#[tokio::test]
async fn entries_without_assessment_snapshot_zero_risk() {
    let store = store_with(Arc::new(InMemoryStorage::new()));
    let entry = store
        .update_health_metrics(HealthMetrics {
            hba1c: Some(5.6),
            ..HealthMetrics::default()
        })
        .await
        .expect("log metrics");
    assert_eq!(entry.risk_level, 0);
    assert!(entry.meals.is_empty());
    assert!(entry.suggestions.is_empty());
}

#[tokio::test]
async fn a_new_day_starts_a_new_entry() {
    let clock = Arc::new(SteppingClock(Mutex::new(today())));
    let store = SessionDataStore::new(
        Arc::new(InMemoryStorage::new()),
        clock.clone(),
        Latency::none(),
    );
    let soda = catalog::find_by_name("Soda").expect("soda");

    store
        .add_food_item(soda.to_food_item(TimeOfDay::Lunch))
        .await
        .expect("day one");
    clock.advance(1);
    store
        .add_food_item(soda.to_food_item(TimeOfDay::Lunch))
        .await
        .expect("day two");

    let entries = store.daily_entries().await;
    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![today(), today() + chrono::Duration::days(1)]);
    assert!(entries.iter().all(|e| e.meals.len() == 1));
}

#[tokio::test]
async fn simulation_uses_default_then_assessed_baseline() {
    let store = store_with(Arc::new(InMemoryStorage::new()));
    let soda = catalog::find_by_name("Soda").expect("soda").to_food_item(TimeOfDay::Snack);

    assert_eq!(store.baseline_risk().await, 35.0);
    let first = store.run_simulation(vec![soda.clone()]).await;
    // 35 + 39 * 0.5 + 140 * 0.01
    assert!((first.resulting_risk - 55.9).abs() < 1e-9);

    store
        .save_profile(UserProfile {
            high_bp: true,
            ..UserProfile::default()
        })
        .await
        .expect("save profile");
    let second = store.run_simulation(vec![soda]).await;
    assert!((second.resulting_risk - 65.9).abs() < 1e-9);
    assert_eq!(store.current_simulation().await, Some(second));
}

#[tokio::test]
async fn open_rehydrates_a_previous_session() {
    let storage = Arc::new(InMemoryStorage::new());
    {
        let store = store_with(storage.clone());
        store.open(user()).await.expect("open");
        store
            .save_profile(UserProfile {
                high_bp: true,
                ..UserProfile::default()
            })
            .await
            .expect("save profile");
        store
            .add_food_item(
                catalog::find_by_name("Banana")
                    .expect("banana")
                    .to_food_item(TimeOfDay::Breakfast),
            )
            .await
            .expect("log banana");
        store.run_simulation(vec![]).await;
    }

    let resumed = store_with(storage);
    resumed.open(user()).await.expect("reopen");

    let assessment = resumed.risk_assessment().await.expect("assessment restored");
    assert_eq!(assessment.risk_level, 45);
    assert!(resumed.profile().await.expect("profile restored").high_bp);
    assert_eq!(resumed.daily_entries().await.len(), 1);
    assert_eq!(resumed.current_simulation().await, None);
}

#[tokio::test]
async fn unreadable_stored_values_count_as_missing() {
    let storage = Arc::new(InMemoryStorage::with_entries([
        (keys::USER_PROFILE, "{\"age\": \"thirty\"}"),
        (keys::RISK_ASSESSMENT, "not json at all"),
        (keys::DAILY_ENTRIES, "[{\"date\": \"yesterday\"}]"),
    ]));
    let store = store_with(storage);
    store.open(user()).await.expect("open tolerates bad data");

    assert_eq!(store.profile().await, None);
    assert_eq!(store.risk_assessment().await, None);
    assert!(store.daily_entries().await.is_empty());
}

#[tokio::test]
async fn close_clears_memory_but_not_storage() {
    let storage = Arc::new(InMemoryStorage::new());
    let store = store_with(storage.clone());
    store.open(user()).await.expect("open");
    store
        .save_profile(UserProfile::default())
        .await
        .expect("save profile");
    store.run_simulation(vec![]).await;

    store.close().await;

    assert_eq!(store.user().await, None);
    assert_eq!(store.profile().await, None);
    assert_eq!(store.risk_assessment().await, None);
    assert_eq!(store.current_simulation().await, None);
    assert_eq!(store.daily_entries().await, Vec::<DailyEntry>::new());
    assert!(storage.get(keys::USER_PROFILE).await.expect("get").is_some());
}

#[tokio::test]
async fn loading_flag_tracks_in_flight_operations() {
    let latency = Latency {
        save_profile: Duration::from_millis(50),
        ..Latency::none()
    };
    let store = Arc::new(SessionDataStore::new(
        Arc::new(InMemoryStorage::new()),
        Arc::new(FixedClock(today())),
        latency,
    ));
    assert!(!store.is_loading());

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.save_profile(UserProfile::default()).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(store.is_loading());

    pending
        .await
        .expect("task joins")
        .expect("profile saved");
    assert!(!store.is_loading());
}

/// Storage that refuses writes to one key once armed.
struct FailingWrites {
    inner: InMemoryStorage,
    key: &'static str,
    armed: AtomicBool,
}

impl FailingWrites {
    fn on(key: &'static str) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            key,
            armed: AtomicBool::new(false),
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FailingWrites {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> PortResult<()> {
        if key == self.key && self.armed.load(Ordering::SeqCst) {
            return Err(PortError::Storage(format!("write to {key} refused")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.inner.remove(key).await
    }

    async fn keys(&self) -> PortResult<Vec<String>> {
        self.inner.keys().await
    }
}

fn store_over(storage: Arc<FailingWrites>) -> SessionDataStore {
    SessionDataStore::new(storage, Arc::new(FixedClock(today())), Latency::none())
}

#[tokio::test]
async fn failed_assessment_write_removes_the_new_profile() {
    let storage = Arc::new(FailingWrites::on(keys::RISK_ASSESSMENT));
    storage.arm();
    let store = store_over(storage.clone());
    store.open(user()).await.expect("open");

    let result = store
        .save_profile(UserProfile {
            high_bp: true,
            high_chol: true,
            ..UserProfile::default()
        })
        .await;

    assert!(matches!(result, Err(PortError::Storage(_))));
    assert_eq!(store.profile().await, None);
    assert_eq!(store.risk_assessment().await, None);
    assert_eq!(storage.get(keys::USER_PROFILE).await.expect("get"), None);
    assert_eq!(storage.get(keys::RISK_ASSESSMENT).await.expect("get"), None);

    let reopened = store_over(storage.clone());
    reopened.open(user()).await.expect("reopen");
    assert_eq!(reopened.profile().await, None);
    assert_eq!(reopened.risk_assessment().await, None);
}

#[tokio::test]
async fn failed_user_write_restores_the_previous_profile_and_assessment() {
    let storage = Arc::new(FailingWrites::on(keys::USER));
    let store = store_over(storage.clone());
    store.open(user()).await.expect("open");
    let first = store
        .save_profile(UserProfile {
            high_chol: true,
            ..UserProfile::default()
        })
        .await
        .expect("first save");
    let profile_before = storage.get(keys::USER_PROFILE).await.expect("get");
    let assessment_before = storage.get(keys::RISK_ASSESSMENT).await.expect("get");

    storage.arm();
    let result = store
        .save_profile(UserProfile {
            high_bp: true,
            high_chol: true,
            ..UserProfile::default()
        })
        .await;

    assert!(result.is_err());
    assert_eq!(store.risk_assessment().await, Some(first.clone()));
    assert_eq!(storage.get(keys::USER_PROFILE).await.expect("get"), profile_before);
    assert_eq!(
        storage.get(keys::RISK_ASSESSMENT).await.expect("get"),
        assessment_before
    );

    let reopened = store_over(storage.clone());
    reopened.open(user()).await.expect("reopen");
    let profile = reopened.profile().await.expect("profile restored");
    assert!(profile.high_chol);
    assert!(!profile.high_bp);
    assert_eq!(reopened.risk_assessment().await, Some(first));
}
