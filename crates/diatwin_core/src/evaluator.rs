//! crates/diatwin_core/src/evaluator.rs
//!
//! Turns a health profile into a risk assessment.
//!
//! The scoring is a three-tier heuristic driven only by the blood pressure and
//! cholesterol flags. It is a placeholder, not a medical model, and the rest of
//! the profile only shows up in the factor breakdown.

use crate::domain::{KeyFactor, RiskAssessment, RiskStatus, UserProfile};

pub const HIGH_BLOOD_PRESSURE: &str = "High Blood Pressure";
pub const HIGH_CHOLESTEROL: &str = "High Cholesterol";
pub const PHYSICAL_ACTIVITY: &str = "Physical Activity";
pub const BMI: &str = "BMI";

/// BMI strictly above this counts against the profile.
pub const BMI_THRESHOLD: f64 = 25.0;

/// Returned for every profile.
pub const SUGGESTIONS: [&str; 4] = [
    "Increase your physical activity",
    "Maintain a balanced diet rich in fruits and vegetables",
    "Monitor your blood pressure regularly",
    "Schedule regular cholesterol checks",
];

/// Evaluates a profile. Total and deterministic.
pub fn evaluate(profile: &UserProfile) -> RiskAssessment {
    let (status, risk_level) = match (profile.high_bp, profile.high_chol) {
        (true, true) => (RiskStatus::Diabetic, 75),
        (true, false) | (false, true) => (RiskStatus::PreDiabetic, 45),
        (false, false) => (RiskStatus::NonDiabetic, 25),
    };

    RiskAssessment {
        status,
        risk_level,
        key_factors: key_factors(profile),
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

fn key_factors(profile: &UserProfile) -> Vec<KeyFactor> {
    vec![
        KeyFactor::new(HIGH_BLOOD_PRESSURE, if profile.high_bp { 30 } else { 0 }),
        KeyFactor::new(HIGH_CHOLESTEROL, if profile.high_chol { 25 } else { 0 }),
        KeyFactor::new(
            PHYSICAL_ACTIVITY,
            if profile.phys_activity { -15 } else { 10 },
        ),
        KeyFactor::new(BMI, if profile.bmi > BMI_THRESHOLD { 20 } else { 0 }),
    ]
}
