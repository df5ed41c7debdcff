//! Table summary rows and trend series.

use serde::{Deserialize, Serialize};

use mealcost_costing::{
    AggregateMetric, UnweightedAverage, WeightedTotal, meal_weighted_total, unweighted_average,
};

/// TOTAL and AVERAGE rows for a table of sub-bucket metrics.
///
/// TOTAL is meal-weighted (`Σcost / Σmeals`); AVERAGE is the plain mean of
/// each row's own per-meal figures. With unequal row volumes they differ,
/// and consumers display both side by side, so both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub total: WeightedTotal,
    pub average: UnweightedAverage,
}

pub fn summarize(rows: &[AggregateMetric]) -> TableSummary {
    TableSummary { total: meal_weighted_total(rows), average: unweighted_average(rows) }
}

/// One point of an oldest→newest trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// Turn ordered `(label, value)` pairs into a trend series, relabelling
/// the most recent point `"Current"` instead of its calendar index.
pub fn trend_series(points: Vec<(String, f64)>) -> Vec<TrendPoint> {
    let last = points.len().saturating_sub(1);
    points
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| TrendPoint {
            label: if i == last { "Current".to_string() } else { label },
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use mealcost_core::{FacilityId, IngredientId, MealService, RecordId};
    use mealcost_costing::{OverheadRate, aggregate};
    use mealcost_period::day_bucket;
    use mealcost_records::{IngredientUnit, ProductionRecord, PurchaseRecord};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn day_metric(day: u32, cost: f64, patients: u32) -> AggregateMetric {
        let date = d(2026, 3, day);
        let purchase = PurchaseRecord::new(
            RecordId::new(),
            IngredientId::new(),
            IngredientUnit::Kg,
            1.0,
            cost,
            None,
            date,
            Utc::now(),
        )
        .unwrap();
        let production = ProductionRecord::new(
            RecordId::new(),
            FacilityId::new(),
            10.0,
            5.0,
            15.0,
            4.0,
            8.0,
            patients,
            MealService::Lunch,
            date,
            Utc::now(),
        )
        .unwrap();
        let rate = OverheadRate { year: 2026, month: 3, rate_per_meal: 10.0 };
        aggregate(&day_bucket(date), &[purchase], &[production], &rate, None)
    }

    /// A tiny expensive day next to a big cheap day: the weighted TOTAL
    /// sits near the big day, the unweighted AVERAGE does not.
    #[test]
    fn total_and_average_rows_are_distinct_outputs() {
        let rows = vec![day_metric(2, 5_000.0, 10), day_metric(3, 9_900.0, 990)];
        let summary = summarize(&rows);

        // TOTAL: 14,900 / 1,000 + 10 overhead.
        assert_eq!(summary.total.total_meals, 1_000);
        assert_eq!(summary.total.cost_per_meal, 14.9);
        assert_eq!(summary.total.total_cpm, 24.9);

        // AVERAGE: mean of 510 and 20.
        assert_eq!(summary.average.total_cpm, 265.0);

        assert_ne!(summary.total.total_cpm, summary.average.total_cpm);
    }

    #[test]
    fn newest_trend_point_is_labeled_current() {
        let series = trend_series(vec![
            ("W1".into(), 210.0),
            ("W2".into(), 230.0),
            ("W3".into(), 190.0),
        ]);
        assert_eq!(series[0].label, "W1");
        assert_eq!(series[1].label, "W2");
        assert_eq!(series[2].label, "Current");
        assert_eq!(series[2].value, 190.0);
    }

    #[test]
    fn empty_trend_is_empty() {
        assert!(trend_series(Vec::new()).is_empty());
    }
}
