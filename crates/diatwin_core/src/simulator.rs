//! crates/diatwin_core/src/simulator.rs
//!
//! The "what-if" meal simulator and the small display classifications built
//! on top of its result.

use crate::domain::{FoodItem, Recommendation, Simulation};
use serde::Serialize;

/// Baseline used when no assessment exists yet.
pub const DEFAULT_BASELINE_RISK: f64 = 35.0;

/// Simulated risk never goes above this.
pub const MAX_SIMULATED_RISK: f64 = 90.0;

/// Flat estimate shown for switching to the alternatives. Not computed.
pub const RISK_REDUCTION: u8 = 15;

const SUGAR_WEIGHT: f64 = 0.5;
const CALORIE_WEIGHT: f64 = 0.01;

const HIGH_RISK_THRESHOLD: f64 = 50.0;

/// Projects the risk of eating `foods` on top of `baseline_risk` and proposes
/// a lighter substitute for each of them.
pub fn simulate(foods: &[FoodItem], baseline_risk: f64) -> Simulation {
    let total_sugar: f64 = foods.iter().map(|food| food.sugar).sum();
    let total_calories: f64 = foods.iter().map(|food| food.calories).sum();

    let resulting_risk = (baseline_risk
        + total_sugar * SUGAR_WEIGHT
        + total_calories * CALORIE_WEIGHT)
        .min(MAX_SIMULATED_RISK);

    Simulation {
        foods: foods.to_vec(),
        resulting_risk,
        recommendation: Recommendation {
            alternative: foods.iter().map(healthier_alternative).collect(),
            risk_reduction: RISK_REDUCTION,
        },
    }
}

/// Builds the synthetic substitute for one food.
pub fn healthier_alternative(food: &FoodItem) -> FoodItem {
    FoodItem {
        id: format!("alt-{}", food.id),
        name: format!("Healthier {}", food.name),
        calories: round_half_up(food.calories * 0.7),
        sugar: round_half_up(food.sugar * 0.5),
        carbs: round_half_up(food.carbs * 0.8),
        ..food.clone()
    }
}

/// Rounds .5 towards positive infinity, the way the alternatives were always
/// rounded (`f64::round` goes away from zero instead).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

impl Simulation {
    /// Pairs each original food with its alternative.
    pub fn swaps(&self) -> impl Iterator<Item = Swap<'_>> {
        self.foods
            .iter()
            .zip(self.recommendation.alternative.iter())
            .map(|(original, alternative)| Swap {
                original,
                alternative,
            })
    }

    pub fn outcome(&self, baseline_risk: f64) -> SimulationOutcome {
        SimulationOutcome::classify(self.resulting_risk, baseline_risk)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Swap<'a> {
    pub original: &'a FoodItem,
    pub alternative: &'a FoodItem,
}

impl Swap<'_> {
    pub fn calories_saved(&self) -> f64 {
        self.original.calories - self.alternative.calories
    }
}

//=========================================================================================
// Display Classifications
//=========================================================================================

/// Qualitative verdict on a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationOutcome {
    HighRiskAlert,
    ModerateIncrease,
    HealthyChoice,
}

impl SimulationOutcome {
    pub fn classify(resulting_risk: f64, baseline_risk: f64) -> Self {
        if resulting_risk > HIGH_RISK_THRESHOLD {
            Self::HighRiskAlert
        } else if resulting_risk > baseline_risk {
            Self::ModerateIncrease
        } else {
            Self::HealthyChoice
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::HighRiskAlert => "High Risk Alert",
            Self::ModerateIncrease => "Increased Risk",
            Self::HealthyChoice => "Healthy Choice",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::HighRiskAlert => {
                "This meal significantly increases your diabetes risk. Consider healthier alternatives or smaller portions."
            }
            Self::ModerateIncrease => {
                "This meal moderately increases your diabetes risk. Be mindful of portion sizes and balance with physical activity."
            }
            Self::HealthyChoice => {
                "Great job! This meal is in line with maintaining or reducing your diabetes risk."
            }
        }
    }
}

/// Four-step band used to colour a risk percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskBand {
    pub fn from_risk(risk: f64) -> Self {
        if risk < 30.0 {
            Self::Low
        } else if risk < 50.0 {
            Self::Moderate
        } else if risk < 70.0 {
            Self::Elevated
        } else {
            Self::High
        }
    }
}

/// Summed nutrition of a set of foods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub sugar: f64,
}

/// Which totals are high enough to flag for a single meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NutritionFlags {
    pub calories: bool,
    pub carbs: bool,
    pub sugar: bool,
}

impl NutritionTotals {
    pub fn of(foods: &[FoodItem]) -> Self {
        foods.iter().fold(Self::default(), |mut totals, food| {
            totals.calories += food.calories;
            totals.carbs += food.carbs;
            totals.protein += food.protein;
            totals.fat += food.fat;
            totals.sugar += food.sugar;
            totals
        })
    }

    pub fn high_flags(&self) -> NutritionFlags {
        NutritionFlags {
            calories: self.calories > 600.0,
            carbs: self.carbs > 60.0,
            sugar: self.sugar > 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeOfDay;

    fn food(id: &str, name: &str, calories: f64, carbs: f64, sugar: f64) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: name.to_string(),
            serving_size: "1 serving".to_string(),
            calories,
            carbs,
            protein: 1.0,
            fat: 0.5,
            sugar,
            time_of_day: TimeOfDay::Snack,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_meal_keeps_baseline() {
        let simulation = simulate(&[], 42.0);
        assert_close(simulation.resulting_risk, 42.0);
        assert!(simulation.recommendation.alternative.is_empty());
        assert_eq!(simulation.recommendation.risk_reduction, RISK_REDUCTION);
    }

    #[test]
    fn soda_raises_risk_by_sugar_and_calories() {
        let soda = food("9", "Soda", 150.0, 39.0, 39.0);
        let simulation = simulate(&[soda], DEFAULT_BASELINE_RISK);
        assert_close(simulation.resulting_risk, 56.0);
    }

    #[test]
    fn result_is_capped_at_ninety() {
        let feast = vec![
            food("1", "Cake", 900.0, 120.0, 80.0),
            food("2", "Milkshake", 700.0, 90.0, 70.0),
        ];
        let simulation = simulate(&feast, 75.0);
        assert_close(simulation.resulting_risk, MAX_SIMULATED_RISK);
    }

    #[test]
    fn alternatives_are_index_aligned_and_lighter() {
        let foods = vec![
            food("a", "Pizza", 285.0, 36.0, 3.8),
            food("b", "Orange Juice", 112.0, 26.0, 21.0),
        ];
        let simulation = simulate(&foods, 25.0);
        let alternatives = &simulation.recommendation.alternative;

        assert_eq!(alternatives.len(), foods.len());
        for (original, alternative) in foods.iter().zip(alternatives) {
            assert_eq!(alternative.id, format!("alt-{}", original.id));
            assert_eq!(alternative.name, format!("Healthier {}", original.name));
            assert_close(alternative.calories, (original.calories * 0.7).round());
            assert_eq!(alternative.protein, original.protein);
            assert_eq!(alternative.time_of_day, original.time_of_day);
        }
        // 285 * 0.7 = 199.5 rounds up, 3.8 * 0.5 = 1.9, 36 * 0.8 = 28.8
        assert_close(alternatives[0].calories, 200.0);
        assert_close(alternatives[0].sugar, 2.0);
        assert_close(alternatives[0].carbs, 29.0);
    }

    #[test]
    fn swaps_report_calorie_savings() {
        let simulation = simulate(&[food("x", "Hamburger", 354.0, 26.0, 6.0)], 35.0);
        let saved: Vec<f64> = simulation.swaps().map(|swap| swap.calories_saved()).collect();
        assert_eq!(saved, vec![106.0]);
    }

    #[test]
    fn outcome_classification() {
        assert_eq!(
            SimulationOutcome::classify(56.0, 35.0),
            SimulationOutcome::HighRiskAlert
        );
        assert_eq!(
            SimulationOutcome::classify(50.0, 35.0),
            SimulationOutcome::ModerateIncrease
        );
        assert_eq!(
            SimulationOutcome::classify(35.0, 35.0),
            SimulationOutcome::HealthyChoice
        );
        assert_eq!(
            SimulationOutcome::classify(75.0, 75.0),
            SimulationOutcome::HighRiskAlert
        );
    }

    #[test]
    fn risk_bands() {
        assert_eq!(RiskBand::from_risk(25.0), RiskBand::Low);
        assert_eq!(RiskBand::from_risk(30.0), RiskBand::Moderate);
        assert_eq!(RiskBand::from_risk(56.0), RiskBand::Elevated);
        assert_eq!(RiskBand::from_risk(70.0), RiskBand::High);
    }

    #[test]
    fn nutrition_totals_and_flags() {
        let totals = NutritionTotals::of(&[
            food("1", "Soda", 140.0, 39.0, 39.0),
            food("2", "French Fries", 365.0, 48.0, 0.4),
        ]);
        assert_close(totals.calories, 505.0);
        assert_close(totals.carbs, 87.0);
        assert_eq!(
            totals.high_flags(),
            NutritionFlags {
                calories: false,
                carbs: true,
                sugar: true,
            }
        );
    }
}
