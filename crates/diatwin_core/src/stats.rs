//! crates/diatwin_core/src/stats.rs
//!
//! Dashboard statistics. Every function here is a pure reduction over the
//! entry history and can be used on its own.

use crate::domain::{DailyEntry, FoodItem, RiskAssessment, TimeOfDay};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Streaks are only looked for this far back.
pub const MAX_STREAK_DAYS: u32 = 30;
pub const TREND_WINDOW: usize = 7;
pub const CALENDAR_DAYS: usize = 28;
pub const TOP_FOODS: usize = 3;

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Mean of the per-day risk snapshots, rounded. Falls back to `fallback`
/// when nothing has been logged.
pub fn average_risk(entries: &[DailyEntry], fallback: u8) -> u8 {
    if entries.is_empty() {
        return fallback;
    }
    let total: u32 = entries.iter().map(|entry| u32::from(entry.risk_level)).sum();
    round_half_up(f64::from(total) / entries.len() as f64) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskTrend {
    /// Absolute change in percentage points.
    pub value: u8,
    pub direction: TrendDirection,
}

impl RiskTrend {
    pub const STABLE: RiskTrend = RiskTrend {
        value: 0,
        direction: TrendDirection::Stable,
    };
}

/// Change between the two most recent entries.
pub fn risk_trend(entries: &[DailyEntry]) -> RiskTrend {
    let mut by_date: Vec<&DailyEntry> = entries.iter().collect();
    by_date.sort_by(|a, b| b.date.cmp(&a.date));

    let (latest, previous) = match by_date.as_slice() {
        [latest, previous, ..] => (latest, previous),
        _ => return RiskTrend::STABLE,
    };

    let diff = i32::from(latest.risk_level) - i32::from(previous.risk_level);
    let direction = match diff {
        d if d > 0 => TrendDirection::Up,
        d if d < 0 => TrendDirection::Down,
        _ => TrendDirection::Stable,
    };
    RiskTrend {
        value: diff.unsigned_abs() as u8,
        direction,
    }
}

/// Consecutive days, ending today, that have an entry.
pub fn streak(entries: &[DailyEntry], today: NaiveDate) -> u32 {
    let mut count = 0;
    for offset in 0..MAX_STREAK_DAYS {
        let date = today - Duration::days(i64::from(offset));
        if entries.iter().any(|entry| entry.date == date) {
            count += 1;
        } else {
            break;
        }
    }
    count
}

/// The last `n` entries in ascending date order.
pub fn recent_entries(entries: &[DailyEntry], n: usize) -> Vec<&DailyEntry> {
    let mut by_date: Vec<&DailyEntry> = entries.iter().collect();
    by_date.sort_by_key(|entry| entry.date);
    let skip = by_date.len().saturating_sub(n);
    by_date.into_iter().skip(skip).collect()
}

/// One flag per day for the `days` days ending today, oldest first.
pub fn activity_calendar(entries: &[DailyEntry], today: NaiveDate, days: usize) -> Vec<bool> {
    (0..days)
        .map(|index| {
            let date = today - Duration::days((days - 1 - index) as i64);
            entries.iter().any(|entry| entry.date == date)
        })
        .collect()
}

pub fn meals_tracked(entries: &[DailyEntry]) -> usize {
    entries.iter().map(|entry| entry.meals.len()).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionAverage {
    pub calories: f64,
    pub carbs: f64,
    pub sugar: f64,
}

/// Per-day averages across every tracked day, rounded.
pub fn daily_nutrition_average(entries: &[DailyEntry]) -> Option<NutritionAverage> {
    if entries.is_empty() {
        return None;
    }

    let days = entries.len() as f64;
    let meals = entries.iter().flat_map(|entry| entry.meals.iter());
    let (calories, carbs, sugar) = meals.fold((0.0, 0.0, 0.0), |(cal, carb, sug), meal| {
        (cal + meal.calories, carb + meal.carbs, sug + meal.sugar)
    });

    Some(NutritionAverage {
        calories: round_half_up(calories / days),
        carbs: round_half_up(carbs / days),
        sugar: round_half_up(sugar / days),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodCount {
    pub name: String,
    pub count: usize,
}

/// Food names by how often they were logged. Ties keep the order in which the
/// names were first seen.
pub fn most_consumed_foods(entries: &[DailyEntry], limit: usize) -> Vec<FoodCount> {
    let mut counts: Vec<FoodCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for meal in entries.iter().flat_map(|entry| entry.meals.iter()) {
        match index.get(meal.name.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(meal.name.as_str(), counts.len());
                counts.push(FoodCount {
                    name: meal.name.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Groups a day's foods by meal slot, in display order, skipping empty slots.
pub fn meals_by_time_of_day(foods: &[FoodItem]) -> Vec<(TimeOfDay, Vec<&FoodItem>)> {
    TimeOfDay::ALL
        .iter()
        .filter_map(|slot| {
            let group: Vec<&FoodItem> = foods
                .iter()
                .filter(|food| food.time_of_day == *slot)
                .collect();
            (!group.is_empty()).then_some((*slot, group))
        })
        .collect()
}

//=========================================================================================
// Dashboard Summary
//=========================================================================================

/// Everything the dashboard shows, computed in one pass for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub current_risk: u8,
    pub status: Option<String>,
    pub days_tracked: usize,
    pub trend: RiskTrend,
    pub average_risk: u8,
    pub meals_tracked: usize,
    pub streak: u32,
    pub calendar: Vec<bool>,
    pub recent_risk: Vec<(NaiveDate, u8)>,
    pub nutrition: Option<NutritionAverage>,
    pub top_foods: Vec<FoodCount>,
    pub suggestions: Vec<String>,
}

impl DashboardSummary {
    pub fn build(
        assessment: Option<&RiskAssessment>,
        entries: &[DailyEntry],
        today: NaiveDate,
    ) -> Self {
        let current_risk = assessment.map(|a| a.risk_level).unwrap_or(0);

        Self {
            current_risk,
            status: assessment.map(|a| a.status.to_string()),
            days_tracked: entries.len(),
            trend: risk_trend(entries),
            average_risk: average_risk(entries, current_risk),
            meals_tracked: meals_tracked(entries),
            streak: streak(entries, today),
            calendar: activity_calendar(entries, today, CALENDAR_DAYS),
            recent_risk: recent_entries(entries, TREND_WINDOW)
                .into_iter()
                .map(|entry| (entry.date, entry.risk_level))
                .collect(),
            nutrition: daily_nutrition_average(entries),
            top_foods: most_consumed_foods(entries, TOP_FOODS),
            suggestions: assessment
                .map(|a| a.suggestions.clone())
                .unwrap_or_default(),
        }
    }
}
