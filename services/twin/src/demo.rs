//! services/twin/src/demo.rs
//!
//! A scripted walk through the product: sign up, answer the questionnaire,
//! log a day of food and readings, try a "what-if" meal, then read the dashboard.

use crate::error::AppError;
use crate::state::AppState;
use diatwin_core::catalog::{self, CatalogFood};
use diatwin_core::simulator::{NutritionFlags, NutritionTotals};
use diatwin_core::{
    DailyEntry, DashboardSummary, HealthMetrics, RiskAssessment, RiskBand, SimulationOutcome,
    TimeOfDay, User, UserProfile,
};
use serde::Serialize;
use tracing::info;

pub const DEMO_EMAIL: &str = "demo@diatwin.local";
pub const DEMO_PASSWORD: &str = "demo";
pub const DEMO_NAME: &str = "Demo User";

const LOGGED_FOODS: [(&str, TimeOfDay); 4] = [
    ("Greek Yogurt", TimeOfDay::Breakfast),
    ("Grilled Chicken Breast", TimeOfDay::Lunch),
    ("Brown Rice", TimeOfDay::Lunch),
    ("Soda", TimeOfDay::Snack),
];

const WHAT_IF_MEAL: [&str; 3] = ["Hamburger", "French Fries", "Soda"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub user: Option<User>,
    pub assessment: Option<RiskAssessment>,
    pub today: Option<DailyEntry>,
    pub simulation: SimulationView,
    pub dashboard: DashboardSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationView {
    pub baseline_risk: f64,
    pub resulting_risk: f64,
    pub band: RiskBand,
    pub outcome: SimulationOutcome,
    pub headline: &'static str,
    pub message: &'static str,
    pub totals: NutritionTotals,
    pub high: NutritionFlags,
    pub swaps: Vec<SwapView>,
    pub risk_reduction: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapView {
    pub original: String,
    pub alternative: String,
    pub calories_saved: f64,
}

fn catalog_food(name: &str) -> Result<&'static CatalogFood, AppError> {
    catalog::find_by_name(name)
        .ok_or_else(|| AppError::Internal(format!("'{}' is missing from the food catalog", name)))
}

/// Runs the scripted session against `state` and reports what the user would see.
pub async fn run(state: &AppState) -> Result<DemoReport, AppError> {
    // --- 1. Resume or sign up ---
    let user = match state.resume().await? {
        Some(user) => {
            info!(email = %user.email, "Resumed existing session.");
            user
        }
        None => state.sign_up(DEMO_EMAIL, DEMO_PASSWORD, DEMO_NAME).await?,
    };

    // --- 2. Questionnaire ---
    if !user.profile_complete || state.store.profile().await.is_none() {
        let profile = UserProfile {
            age: 52,
            high_bp: true,
            chol_check: true,
            bmi: 27.4,
            phys_activity: false,
            ..UserProfile::default()
        };
        state.store.save_profile(profile).await?;
    }

    // --- 3. Today's log ---
    for (name, time_of_day) in LOGGED_FOODS {
        let food = catalog_food(name)?.to_food_item(time_of_day);
        state.store.add_food_item(food).await?;
    }
    state
        .store
        .update_health_metrics(HealthMetrics {
            weight: Some(84.2),
            blood_pressure_systolic: Some(138.0),
            blood_pressure_diastolic: Some(88.0),
            ..HealthMetrics::default()
        })
        .await?;

    // --- 4. What-if meal ---
    let meal = WHAT_IF_MEAL
        .iter()
        .map(|name| catalog_food(name).map(|food| food.to_food_item(TimeOfDay::Dinner)))
        .collect::<Result<Vec<_>, _>>()?;
    let baseline_risk = state.store.baseline_risk().await;
    let simulation = state.store.run_simulation(meal).await;
    let outcome = simulation.outcome(baseline_risk);
    let totals = NutritionTotals::of(&simulation.foods);

    let simulation_view = SimulationView {
        baseline_risk,
        resulting_risk: simulation.resulting_risk,
        band: RiskBand::from_risk(simulation.resulting_risk),
        outcome,
        headline: outcome.title(),
        message: outcome.message(),
        totals,
        high: totals.high_flags(),
        swaps: simulation
            .swaps()
            .map(|swap| SwapView {
                original: swap.original.name.clone(),
                alternative: swap.alternative.name.clone(),
                calories_saved: swap.calories_saved(),
            })
            .collect(),
        risk_reduction: simulation.recommendation.risk_reduction,
    };

    // --- 5. Dashboard ---
    Ok(DemoReport {
        user: state.store.user().await,
        assessment: state.store.risk_assessment().await,
        today: state.store.today_entry().await,
        simulation: simulation_view,
        dashboard: state.dashboard().await,
    })
}
