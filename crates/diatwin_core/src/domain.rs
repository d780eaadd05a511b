//! crates/diatwin_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! Field names serialize in camelCase so the persisted JSON keeps the shape
//! the rest of the key space expects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Session User
//=========================================================================================

/// The opaque user record issued by the mock auth flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub profile_complete: bool,
}

//=========================================================================================
// Health Profile
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// Self-reported answers from the profile questionnaire.
///
/// A profile is always saved whole; there is no partial update. Numeric
/// answers are taken as given, without range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    // Personal
    pub age: u32,
    pub sex: Sex,
    pub education: String,
    pub income: String,

    // Medical history
    #[serde(rename = "highBP")]
    pub high_bp: bool,
    pub high_chol: bool,
    pub chol_check: bool,
    pub smoker: bool,
    pub stroke: bool,
    pub heart_disease_or_attack: bool,

    // Lifestyle
    pub phys_activity: bool,
    pub fruits: bool,
    pub veggies: bool,
    pub alcohol: bool,
    pub bmi: f64,
    /// Days of poor mental health in the last 30.
    pub mental_health: u32,
    /// Days of poor physical health in the last 30.
    pub physical_health: u32,
    pub diff_walking: bool,
    /// Hours per night.
    pub sleep_time: f64,
}

impl Default for UserProfile {
    /// The answers the questionnaire starts from.
    fn default() -> Self {
        Self {
            age: 30,
            sex: Sex::Male,
            education: "College".to_string(),
            income: "Middle".to_string(),
            high_bp: false,
            high_chol: false,
            chol_check: false,
            smoker: false,
            stroke: false,
            heart_disease_or_attack: false,
            phys_activity: true,
            fruits: true,
            veggies: true,
            alcohol: false,
            bmi: 24.5,
            mental_health: 5,
            physical_health: 3,
            diff_walking: false,
            sleep_time: 7.0,
        }
    }
}

//=========================================================================================
// Risk Assessment
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskStatus {
    NonDiabetic,
    PreDiabetic,
    Diabetic,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::NonDiabetic => "non-diabetic",
            RiskStatus::PreDiabetic => "pre-diabetic",
            RiskStatus::Diabetic => "diabetic",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named contribution to the risk level. Positive impacts raise risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFactor {
    pub factor: String,
    pub impact: i32,
}

impl KeyFactor {
    pub fn new(factor: impl Into<String>, impact: i32) -> Self {
        Self {
            factor: factor.into(),
            impact,
        }
    }
}

/// Derived from a profile, never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub status: RiskStatus,
    /// Percentage, 0-100.
    pub risk_level: u8,
    pub key_factors: Vec<KeyFactor>,
    pub suggestions: Vec<String>,
}

//=========================================================================================
// Food Log
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl TimeOfDay {
    /// Meal slots in the order a day is displayed.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Breakfast,
        TimeOfDay::Lunch,
        TimeOfDay::Dinner,
        TimeOfDay::Snack,
    ];
}

/// A single logged or simulated food. Identity is the `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub serving_size: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub sugar: f64,
    pub time_of_day: TimeOfDay,
}

/// Optional clinical readings for a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hba1c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure_diastolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_total: Option<f64>,
    #[serde(
        default,
        rename = "cholesterolHDL",
        skip_serializing_if = "Option::is_none"
    )]
    pub cholesterol_hdl: Option<f64>,
    #[serde(
        default,
        rename = "cholesterolLDL",
        skip_serializing_if = "Option::is_none"
    )]
    pub cholesterol_ldl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl HealthMetrics {
    /// Shallow merge: every field present in `update` overwrites ours, the
    /// rest are kept.
    pub fn merge(&mut self, update: &HealthMetrics) {
        fn take(slot: &mut Option<f64>, incoming: Option<f64>) {
            if incoming.is_some() {
                *slot = incoming;
            }
        }

        take(&mut self.hba1c, update.hba1c);
        take(&mut self.blood_pressure_systolic, update.blood_pressure_systolic);
        take(&mut self.blood_pressure_diastolic, update.blood_pressure_diastolic);
        take(&mut self.cholesterol_total, update.cholesterol_total);
        take(&mut self.cholesterol_hdl, update.cholesterol_hdl);
        take(&mut self.cholesterol_ldl, update.cholesterol_ldl);
        take(&mut self.weight, update.weight);
    }
}

/// Everything logged for one calendar date. The date is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub meals: Vec<FoodItem>,
    pub health_metrics: HealthMetrics,
    /// Snapshot of the assessment's risk level when the entry was created.
    pub risk_level: u8,
    pub suggestions: Vec<String>,
}

impl DailyEntry {
    pub fn new(date: NaiveDate, risk_level: u8) -> Self {
        Self {
            date,
            meals: Vec::new(),
            health_metrics: HealthMetrics::default(),
            risk_level,
            suggestions: Vec::new(),
        }
    }
}

//=========================================================================================
// Simulation
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Index-aligned with `Simulation::foods`.
    pub alternative: Vec<FoodItem>,
    pub risk_reduction: u8,
}

/// The outcome of a "what-if" meal run. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub foods: Vec<FoodItem>,
    pub resulting_risk: f64,
    pub recommendation: Recommendation,
}
