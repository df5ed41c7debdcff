//! `mealcost-costing` — the CPM aggregation and overhead-carryover engine.
//!
//! Turns purchase/production/indirect-cost records into bucketed cost
//! metrics. Two rules anchor everything here:
//!
//! - the meal denominator is always `patients_served`, never the
//!   portion estimate `meals_calculated`;
//! - a month's overhead rate is the previous month's actual indirect
//!   cost per meal, fixed at the start of the month.

pub mod aggregate;
pub mod overhead;

pub use aggregate::{
    AggregateMetric, UnweightedAverage, WeightedTotal, aggregate, meal_weighted_total,
    per_service, unweighted_average, unweighted_service_average, weekly_within_month,
};
pub use overhead::{OverheadRate, OverheadRateProvider, carry_forward_rate};
