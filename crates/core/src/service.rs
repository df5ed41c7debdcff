//! The meal-service aggregation dimension.

use serde::{Deserialize, Serialize};

/// A meal occasion.
///
/// Closed set by construction: every aggregation branch that splits by
/// service matches exhaustively on this enum, so a new occasion cannot be
/// added without revisiting each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MealService {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealService {
    /// All services, in reporting order.
    pub const ALL: [MealService; 3] = [
        MealService::Breakfast,
        MealService::Lunch,
        MealService::Dinner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealService::Breakfast => "Breakfast",
            MealService::Lunch => "Lunch",
            MealService::Dinner => "Dinner",
        }
    }
}

impl core::fmt::Display for MealService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
