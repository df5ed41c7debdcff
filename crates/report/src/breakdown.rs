//! Monthly indirect-cost breakdown.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use mealcost_core::{per_meal, round1, round2};
use mealcost_records::IndirectCostRecord;

/// One grouped line of the breakdown, keyed by ledger code + category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCostLine {
    pub code: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    /// Share of the month's total, rounded to 1 decimal.
    pub percentage: f64,
}

/// Detailed view of one month's overhead.
///
/// `cost_per_meal` here is the month's own indirect cost over its own
/// meals — a diagnostic figure, distinct from the carried rate the next
/// month charges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCostBreakdown {
    pub total_amount: f64,
    pub total_meals: u64,
    pub cost_per_meal: f64,
    pub details: Vec<IndirectCostLine>,
    pub degraded: bool,
}

impl IndirectCostBreakdown {
    /// All-zero breakdown for a failed fetch in best-effort mode.
    pub fn degraded() -> Self {
        Self {
            total_amount: 0.0,
            total_meals: 0,
            cost_per_meal: 0.0,
            details: Vec::new(),
            degraded: true,
        }
    }
}

/// Group a month's indirect costs by ledger code + category, with each
/// group's share of the total. Lines are sorted by amount, largest first.
pub fn breakdown(costs: &[IndirectCostRecord], total_meals: u64) -> IndirectCostBreakdown {
    let total_amount: f64 = costs.iter().map(|c| c.amount).sum();

    let mut groups: HashMap<String, IndirectCostLine> = HashMap::new();
    for cost in costs {
        let line = groups.entry(cost.grouping_key()).or_insert_with(|| IndirectCostLine {
            code: cost.code.clone().unwrap_or_default(),
            category: cost.category.clone(),
            description: cost.description.clone(),
            amount: 0.0,
            percentage: 0.0,
        });
        line.amount += cost.amount;
    }

    let mut details: Vec<IndirectCostLine> = groups
        .into_values()
        .map(|mut line| {
            line.percentage = if total_amount > 0.0 {
                round1(line.amount / total_amount * 100.0)
            } else {
                0.0
            };
            line
        })
        .collect();
    // Largest first; category as a deterministic tie-break.
    details.sort_by(|a, b| {
        b.amount.total_cmp(&a.amount).then_with(|| a.category.cmp(&b.category))
    });

    IndirectCostBreakdown {
        total_amount: round2(total_amount),
        total_meals,
        cost_per_meal: round2(per_meal(total_amount, total_meals)),
        details,
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mealcost_core::RecordId;

    fn cost(category: &str, code: Option<&str>, amount: f64) -> IndirectCostRecord {
        IndirectCostRecord::new(
            RecordId::new(),
            2026,
            2,
            category,
            format!("{category} for the month"),
            amount,
            code.map(str::to_owned),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn lines_group_by_code_and_category_and_sort_descending() {
        let costs = vec![
            cost("Utilities", Some("61110"), 3_000.0),
            cost("Utilities", Some("61110"), 1_000.0),
            cost("Salaries", Some("62000"), 5_000.0),
            cost("Transport", None, 1_000.0),
        ];
        let view = breakdown(&costs, 500);

        assert_eq!(view.total_amount, 10_000.0);
        assert_eq!(view.cost_per_meal, 20.0);
        assert_eq!(view.details.len(), 3);
        assert_eq!(view.details[0].category, "Salaries");
        assert_eq!(view.details[0].percentage, 50.0);
        assert_eq!(view.details[1].category, "Utilities");
        assert_eq!(view.details[1].amount, 4_000.0);
        assert_eq!(view.details[1].percentage, 40.0);
        assert_eq!(view.details[2].category, "Transport");
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let view = breakdown(&[cost("Utilities", None, 0.0)], 0);
        assert_eq!(view.cost_per_meal, 0.0);
        assert_eq!(view.details[0].percentage, 0.0);
    }

    #[test]
    fn empty_month_is_not_an_error() {
        let view = breakdown(&[], 120);
        assert_eq!(view.total_amount, 0.0);
        assert!(view.details.is_empty());
        assert!(!view.degraded);
    }
}
