//! Overhead carry-forward: month M charges month M−1's actual indirect
//! cost per meal as a fixed RWF-per-meal rate.
//!
//! There is exactly one rate computation in the workspace and this is
//! it. Every bucket — day, week or month — anchors to the rate of its
//! containing month, so a week spanning two months is shown with a
//! different rate depending on which month's report lists it.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mealcost_core::{per_meal, round2};
use mealcost_period::MonthKey;
use mealcost_records::{FetchResult, IndirectCostRecord, ProductionRecord, RecordStore};

/// Fixed RWF-per-meal overhead charge for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadRate {
    pub year: i32,
    pub month: u32,
    pub rate_per_meal: f64,
}

impl OverheadRate {
    /// Zero rate, used when no prior-month data exists.
    pub fn zero(key: MonthKey) -> Self {
        Self { year: key.year, month: key.month, rate_per_meal: 0.0 }
    }
}

/// Compute the rate month `target` carries from the previous month's
/// records. Missing data yields a zero rate; this never fails.
pub fn carry_forward_rate(
    target: MonthKey,
    prior_indirect: &[IndirectCostRecord],
    prior_productions: &[ProductionRecord],
) -> OverheadRate {
    let total_indirect: f64 = prior_indirect.iter().map(|c| c.amount).sum();
    let total_meals: u64 = prior_productions
        .iter()
        .map(|p| u64::from(p.patients_served))
        .sum();
    let rate = round2(per_meal(total_indirect, total_meals));
    debug!(
        year = target.year,
        month = target.month,
        total_indirect,
        total_meals,
        rate,
        "carry-forward overhead rate"
    );
    OverheadRate { year: target.year, month: target.month, rate_per_meal: rate }
}

/// The one place overhead rates come from.
///
/// A month's rate is fixed once its source month (the month before it)
/// closes, so those rates are memoized. While the source month is still
/// the current month its records may receive edits, and the rate is
/// recomputed per call instead. Later edits to a closed month do *not*
/// move an already-cached rate; a caller that really wants a recompute
/// must say so via [`OverheadRateProvider::invalidate`].
pub struct OverheadRateProvider<S> {
    store: S,
    cache: Mutex<HashMap<MonthKey, OverheadRate>>,
}

impl<S: RecordStore> OverheadRateProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store, cache: Mutex::new(HashMap::new()) }
    }

    /// The rate month `target` carries, fetching prior-month records
    /// concurrently when not cached.
    pub async fn rate_for(&self, target: MonthKey, today: NaiveDate) -> FetchResult<OverheadRate> {
        if let Some(rate) = self.cached(target) {
            return Ok(rate);
        }

        let prior = target.prev();
        let (start, end) = prior.bounds();
        let (costs, productions) = tokio::try_join!(
            self.store.indirect_costs(prior.year, prior.month),
            self.store.productions(start, end),
        )?;
        let rate = carry_forward_rate(target, &costs, &productions);

        if prior < MonthKey::from_date(today) {
            self.lock_cache().insert(target, rate);
        }
        Ok(rate)
    }

    /// Drop a memoized rate so the next call recomputes it from the
    /// store. This is the explicit-recompute escape hatch.
    pub fn invalidate(&self, target: MonthKey) {
        self.lock_cache().remove(&target);
    }

    fn cached(&self, target: MonthKey) -> Option<OverheadRate> {
        self.lock_cache().get(&target).copied()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<MonthKey, OverheadRate>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
