//! crates/diatwin_core/src/catalog.rs
//!
//! The built-in food database that both the daily log and the simulator pick from.

use crate::domain::{FoodItem, TimeOfDay};
use uuid::Uuid;

/// A catalog row. Becomes a `FoodItem` once it is assigned a meal slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogFood {
    pub name: &'static str,
    pub serving_size: &'static str,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub sugar: f64,
}

impl CatalogFood {
    /// Creates a loggable item with a fresh id.
    pub fn to_food_item(&self, time_of_day: TimeOfDay) -> FoodItem {
        FoodItem {
            id: Uuid::new_v4().to_string(),
            name: self.name.to_string(),
            serving_size: self.serving_size.to_string(),
            calories: self.calories,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
            sugar: self.sugar,
            time_of_day,
        }
    }
}

const fn row(
    name: &'static str,
    serving_size: &'static str,
    calories: f64,
    carbs: f64,
    protein: f64,
    fat: f64,
    sugar: f64,
) -> CatalogFood {
    CatalogFood {
        name,
        serving_size,
        calories,
        carbs,
        protein,
        fat,
        sugar,
    }
}

pub const FOOD_CATALOG: [CatalogFood; 15] = [
    row("Apple", "1 medium (182g)", 95.0, 25.0, 0.5, 0.3, 19.0),
    row("Banana", "1 medium (118g)", 105.0, 27.0, 1.3, 0.4, 14.0),
    row("Grilled Chicken Breast", "3 oz (85g)", 128.0, 0.0, 26.0, 2.7, 0.0),
    row("Brown Rice", "1 cup cooked (195g)", 216.0, 45.0, 5.0, 1.8, 0.7),
    row("Salmon", "3 oz (85g)", 177.0, 0.0, 19.0, 11.0, 0.0),
    row("Avocado", "1/2 medium (68g)", 114.0, 6.0, 1.3, 10.5, 0.2),
    row("Broccoli", "1 cup chopped (91g)", 31.0, 6.0, 2.6, 0.3, 1.5),
    row("Whole Wheat Bread", "1 slice (43g)", 120.0, 20.0, 4.0, 2.0, 3.0),
    row("Soda", "12 oz can (355ml)", 140.0, 39.0, 0.0, 0.0, 39.0),
    row("Pizza", "1 slice (63g)", 285.0, 36.0, 12.0, 10.0, 3.8),
    row("Hamburger", "1 regular (110g)", 354.0, 26.0, 20.0, 17.0, 6.0),
    row("French Fries", "Medium serving (117g)", 365.0, 48.0, 4.0, 18.0, 0.4),
    row("Ice Cream", "1/2 cup (66g)", 137.0, 16.0, 2.3, 7.0, 14.0),
    row("Orange Juice", "1 cup (248g)", 112.0, 26.0, 1.7, 0.5, 21.0),
    row("Greek Yogurt", "6 oz (170g)", 100.0, 6.0, 17.0, 0.0, 6.0),
];

/// Search terms must be longer than this (after trimming) to match anything.
const MIN_TERM_LEN: usize = 2;

/// Case-insensitive substring search over food names, in catalog order.
pub fn search(term: &str) -> Vec<&'static CatalogFood> {
    if term.trim().chars().count() <= MIN_TERM_LEN {
        return Vec::new();
    }

    let needle = term.to_lowercase();
    FOOD_CATALOG
        .iter()
        .filter(|food| food.name.to_lowercase().contains(&needle))
        .collect()
}

pub fn find_by_name(name: &str) -> Option<&'static CatalogFood> {
    FOOD_CATALOG
        .iter()
        .find(|food| food.name.eq_ignore_ascii_case(name))
}
