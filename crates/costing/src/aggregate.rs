//! Bucketed cost metrics.

use serde::{Deserialize, Serialize};

use mealcost_core::{MealService, per_meal, round2};
use mealcost_period::{MonthKey, PeriodBucket, weeks_overlapping_month};
use mealcost_records::{ProductionRecord, PurchaseRecord};

use crate::overhead::OverheadRate;

/// Cost metrics for one bucket, optionally narrowed to one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetric {
    pub bucket: PeriodBucket,
    pub service: Option<MealService>,
    pub total_ingredient_cost: f64,
    /// Headcount actually served (`patients_served`), never the portion
    /// estimate.
    pub total_meals: u64,
    pub cost_per_meal: f64,
    pub overhead_per_meal: f64,
    pub total_cpm: f64,
    /// Set in best-effort mode when this bucket's fetches failed and the
    /// metric was zeroed instead of failing the whole report.
    pub degraded: bool,
}

impl AggregateMetric {
    /// All-zero metric marking a failed fetch in best-effort mode.
    pub fn degraded(bucket: PeriodBucket, service: Option<MealService>) -> Self {
        Self {
            bucket,
            service,
            total_ingredient_cost: 0.0,
            total_meals: 0,
            cost_per_meal: 0.0,
            overhead_per_meal: 0.0,
            total_cpm: 0.0,
            degraded: true,
        }
    }

    /// Absolute overhead cost this bucket carries (rate times volume).
    pub fn overhead_cost(&self) -> f64 {
        self.overhead_per_meal * self.total_meals as f64
    }
}

/// Combine records falling inside a bucket into cost metrics.
///
/// With a service filter, productions must match it exactly and purchases
/// without a service tag are left out; unfiltered aggregation counts
/// everything.
///
/// Zero-denominator convention: a bucket with no matching records at all
/// is all-zero (`total_cpm = 0`); a bucket with records but zero meals
/// keeps `cost_per_meal = 0` and reports `total_cpm = overhead` — never a
/// NaN or infinity either way.
pub fn aggregate(
    bucket: &PeriodBucket,
    purchases: &[PurchaseRecord],
    productions: &[ProductionRecord],
    overhead: &OverheadRate,
    service: Option<MealService>,
) -> AggregateMetric {
    let mut total_cost = 0.0;
    let mut total_meals: u64 = 0;
    let mut matched: usize = 0;

    for p in purchases {
        if !bucket.contains(p.purchase_date) {
            continue;
        }
        if service.is_some() && p.service != service {
            continue;
        }
        total_cost += p.total_price;
        matched += 1;
    }

    for r in productions {
        if !bucket.contains(r.production_date) {
            continue;
        }
        if let Some(wanted) = service {
            if r.service != wanted {
                continue;
            }
        }
        total_meals += u64::from(r.patients_served);
        matched += 1;
    }

    if matched == 0 {
        return AggregateMetric {
            bucket: bucket.clone(),
            service,
            total_ingredient_cost: 0.0,
            total_meals: 0,
            cost_per_meal: 0.0,
            overhead_per_meal: 0.0,
            total_cpm: 0.0,
            degraded: false,
        };
    }

    let cost_per_meal = round2(per_meal(total_cost, total_meals));
    AggregateMetric {
        bucket: bucket.clone(),
        service,
        total_ingredient_cost: round2(total_cost),
        total_meals,
        cost_per_meal,
        overhead_per_meal: overhead.rate_per_meal,
        total_cpm: round2(cost_per_meal + overhead.rate_per_meal),
        degraded: false,
    }
}

/// One metric per meal service for the bucket, in reporting order.
pub fn per_service(
    bucket: &PeriodBucket,
    purchases: &[PurchaseRecord],
    productions: &[ProductionRecord],
    overhead: &OverheadRate,
) -> Vec<AggregateMetric> {
    MealService::ALL
        .iter()
        .map(|s| aggregate(bucket, purchases, productions, overhead, Some(*s)))
        .collect()
}

/// One metric per Sunday–Saturday week overlapping the month, each week
/// clipped to the month's own days and carrying the month's rate. The
/// same calendar week therefore shows up in two monthly tables with
/// different numbers when it straddles a boundary.
pub fn weekly_within_month(
    month: MonthKey,
    purchases: &[PurchaseRecord],
    productions: &[ProductionRecord],
    overhead: &OverheadRate,
) -> Vec<AggregateMetric> {
    weeks_overlapping_month(month)
        .iter()
        .map(|w| aggregate(&w.clipped, purchases, productions, overhead, None))
        .collect()
}

/// Volume-weighted rollup: `Σcost / Σmeals` across the given metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedTotal {
    pub total_ingredient_cost: f64,
    pub total_meals: u64,
    pub cost_per_meal: f64,
    pub overhead_per_meal: f64,
    pub total_cpm: f64,
}

/// Meal-weighted total across sub-buckets or services. High-volume rows
/// pull the figure toward themselves; compare
/// [`unweighted_service_average`].
pub fn meal_weighted_total(metrics: &[AggregateMetric]) -> WeightedTotal {
    let total_cost: f64 = metrics.iter().map(|m| m.total_ingredient_cost).sum();
    let overhead_cost: f64 = metrics.iter().map(AggregateMetric::overhead_cost).sum();
    let total_meals: u64 = metrics.iter().map(|m| m.total_meals).sum();

    let cost_per_meal = round2(per_meal(total_cost, total_meals));
    let overhead_per_meal = round2(per_meal(overhead_cost, total_meals));
    WeightedTotal {
        total_ingredient_cost: round2(total_cost),
        total_meals,
        cost_per_meal,
        overhead_per_meal,
        total_cpm: round2(cost_per_meal + overhead_per_meal),
    }
}

/// Plain arithmetic mean of each metric's own per-meal figures, volume
/// ignored. Intentionally different from [`meal_weighted_total`] whenever
/// row volumes are unequal; report tables show both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnweightedAverage {
    pub cost_per_meal: f64,
    pub overhead_per_meal: f64,
    pub total_cpm: f64,
}

pub fn unweighted_average(metrics: &[AggregateMetric]) -> UnweightedAverage {
    if metrics.is_empty() {
        return UnweightedAverage { cost_per_meal: 0.0, overhead_per_meal: 0.0, total_cpm: 0.0 };
    }
    let n = metrics.len() as f64;
    UnweightedAverage {
        cost_per_meal: round2(metrics.iter().map(|m| m.cost_per_meal).sum::<f64>() / n),
        overhead_per_meal: round2(metrics.iter().map(|m| m.overhead_per_meal).sum::<f64>() / n),
        total_cpm: round2(metrics.iter().map(|m| m.total_cpm).sum::<f64>() / n),
    }
}

/// Mean of each service's own total CPM, volume ignored.
pub fn unweighted_service_average(per_service: &[AggregateMetric]) -> f64 {
    unweighted_average(per_service).total_cpm
}
