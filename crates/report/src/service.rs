//! Async report orchestration over a [`RecordStore`].
//!
//! Every method recomputes from freshly fetched records; no aggregate
//! state survives between calls. Callers pass `today` explicitly so the
//! wall clock stays out of the computation (and out of the tests).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use mealcost_core::{DomainError, FacilityId, MealService, ensure_range, round1};
use mealcost_costing::{
    AggregateMetric, OverheadRate, OverheadRateProvider, aggregate, per_service,
    unweighted_service_average, weekly_within_month,
};
use mealcost_period::{
    MonthKey, PeriodBucket, day_bucket, month_bucket, month_key, week_bucket, week_bucket_of,
    week_start, weeks_overlapping_month, year_bucket,
};
use mealcost_records::{FetchError, ProductionRecord, PurchaseRecord, RecordStore};

use crate::assembler::{TableSummary, TrendPoint, summarize, trend_series};
use crate::breakdown::{IndirectCostBreakdown, breakdown};

/// Report-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// How upstream fetch failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Any failed fetch fails the whole report. The default.
    #[default]
    Strict,
    /// Failed sub-fetches are zeroed and flagged `degraded`; never silent.
    BestEffort,
}

/// Per-day table for one Sunday–Saturday week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub week: PeriodBucket,
    /// Rate of the week's anchoring month (the month of its first day).
    pub overhead: OverheadRate,
    pub days: Vec<AggregateMetric>,
    pub summary: TableSummary,
    pub degraded: bool,
}

/// Per-week table for one month, plus the per-service split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: PeriodBucket,
    pub overhead: OverheadRate,
    /// Weeks clipped to this month's days, each carrying `overhead`.
    pub weeks: Vec<AggregateMetric>,
    pub services: Vec<AggregateMetric>,
    /// Mean of the three services' own total CPM, volume ignored.
    pub service_average_cpm: f64,
    pub summary: TableSummary,
    pub degraded: bool,
}

/// Per-month table for one year; each month carries its own rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualReport {
    pub year: i32,
    pub months: Vec<AggregateMetric>,
    pub summary: TableSummary,
    pub degraded: bool,
}

/// Per-day table for an arbitrary half-open range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub service: Option<MealService>,
    pub days: Vec<AggregateMetric>,
    pub summary: TableSummary,
    pub degraded: bool,
}

/// One facility's slice of yesterday's meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityShare {
    pub facility_id: FacilityId,
    pub meals: u64,
    pub percentage: f64,
}

/// The landing-page numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub yesterday_meals: u64,
    pub week_to_date_meals: u64,
    pub current_week_cpm: f64,
    pub month_to_date_cpm: f64,
    /// Yesterday's meals by facility, largest first.
    pub facility_contribution: Vec<FacilityShare>,
    pub seven_day_trend: Vec<TrendPoint>,
    /// Trailing five weeks of total CPM, newest labeled "Current".
    pub week_cpm_trend: Vec<TrendPoint>,
    pub degraded: bool,
}

impl Dashboard {
    fn zeroed(degraded: bool) -> Self {
        Self {
            yesterday_meals: 0,
            week_to_date_meals: 0,
            current_week_cpm: 0.0,
            month_to_date_cpm: 0.0,
            facility_contribution: Vec::new(),
            seven_day_trend: Vec::new(),
            week_cpm_trend: Vec::new(),
            degraded,
        }
    }
}

/// Entry point for report consumers.
pub struct ReportService<S> {
    store: Arc<S>,
    overhead: OverheadRateProvider<Arc<S>>,
    mode: FetchMode,
}

impl<S: RecordStore> ReportService<S> {
    pub fn new(store: S) -> Self {
        let store = Arc::new(store);
        Self { overhead: OverheadRateProvider::new(Arc::clone(&store)), store, mode: FetchMode::Strict }
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Access to the rate cache, e.g. to force a recompute after a
    /// deliberate edit of a closed month.
    pub fn overhead_provider(&self) -> &OverheadRateProvider<Arc<S>> {
        &self.overhead
    }

    /// Per-day report for week `week` of `year`.
    ///
    /// Days keep the rate of their *own* containing month, so the days a
    /// spilling week borrows from the next month are charged that month's
    /// rate, not the anchor's.
    pub async fn weekly_report(
        &self,
        year: i32,
        week: u32,
        today: NaiveDate,
    ) -> Result<WeeklyReport, ReportError> {
        let bucket = week_bucket_of(year, week)?;
        let anchor = month_key(bucket.start);
        let (week_rate, mut degraded) = self.rate_or_zero(anchor, today).await?;
        let fetched = self.fetch_range(bucket.start, bucket.end).await?;

        let mut rates = HashMap::from([(anchor, week_rate)]);
        let mut days = Vec::with_capacity(7);
        match &fetched {
            Some((purchases, productions)) => {
                for date in days_of(&bucket) {
                    let (rate, rate_degraded) =
                        self.month_rate_memo(&mut rates, month_key(date), today).await?;
                    degraded |= rate_degraded;
                    days.push(aggregate(&day_bucket(date), purchases, productions, &rate, None));
                }
            }
            None => {
                degraded = true;
                days.extend(days_of(&bucket).map(|d| AggregateMetric::degraded(day_bucket(d), None)));
            }
        }

        let summary = summarize(&days);
        Ok(WeeklyReport { week: bucket, overhead: week_rate, days, summary, degraded })
    }

    /// Per-week report for one month. Weeks overlapping the month appear
    /// clipped to the month's days and all carry the month's carried rate.
    pub async fn monthly_report(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<MonthlyReport, ReportError> {
        let key = MonthKey::new(year, month)?;
        let bucket = month_bucket(key);
        let (rate, rate_degraded) = self.rate_or_zero(key, today).await?;
        let fetched = self.fetch_range(bucket.start, bucket.end).await?;

        let (weeks, services) = match &fetched {
            Some((purchases, productions)) => (
                weekly_within_month(key, purchases, productions, &rate),
                per_service(&bucket, purchases, productions, &rate),
            ),
            None => (
                weeks_overlapping_month(key)
                    .into_iter()
                    .map(|w| AggregateMetric::degraded(w.clipped, None))
                    .collect(),
                MealService::ALL
                    .iter()
                    .map(|s| AggregateMetric::degraded(bucket.clone(), Some(*s)))
                    .collect(),
            ),
        };

        let summary = summarize(&weeks);
        Ok(MonthlyReport {
            month: bucket,
            overhead: rate,
            service_average_cpm: unweighted_service_average(&services),
            weeks,
            services,
            summary,
            degraded: rate_degraded || fetched.is_none(),
        })
    }

    /// Per-month report for one year; month M carries the rate computed
    /// from M−1, so the rate column moves through the year.
    pub async fn annual_report(
        &self,
        year: i32,
        today: NaiveDate,
    ) -> Result<AnnualReport, ReportError> {
        let bucket = year_bucket(year);
        let fetched = self.fetch_range(bucket.start, bucket.end).await?;
        let mut degraded = fetched.is_none();

        let mut months = Vec::with_capacity(12);
        for month in 1..=12 {
            let key = MonthKey::from_parts(year, month);
            let (rate, rate_degraded) = self.rate_or_zero(key, today).await?;
            degraded |= rate_degraded;
            let month = month_bucket(key);
            months.push(match &fetched {
                Some((purchases, productions)) => {
                    aggregate(&month, purchases, productions, &rate, None)
                }
                None => AggregateMetric::degraded(month, None),
            });
        }

        let summary = summarize(&months);
        Ok(AnnualReport { year, months, summary, degraded })
    }

    /// Per-day report for an arbitrary `[start, end)` range, optionally
    /// narrowed to one service. Rejects empty/inverted ranges before any
    /// fetch.
    pub async fn range_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        service: Option<MealService>,
        today: NaiveDate,
    ) -> Result<RangeReport, ReportError> {
        ensure_range(start, end)?;
        let fetched = self.fetch_range(start, end).await?;

        let mut rates = HashMap::new();
        let mut degraded = fetched.is_none();
        let mut days = Vec::new();
        for date in start.iter_days().take_while(|d| *d < end) {
            match &fetched {
                Some((purchases, productions)) => {
                    let (rate, rate_degraded) =
                        self.month_rate_memo(&mut rates, month_key(date), today).await?;
                    degraded |= rate_degraded;
                    days.push(aggregate(&day_bucket(date), purchases, productions, &rate, service));
                }
                None => days.push(AggregateMetric::degraded(day_bucket(date), service)),
            }
        }

        let summary = summarize(&days);
        Ok(RangeReport { start, end, service, days, summary, degraded })
    }

    /// Landing-page numbers around `today`.
    pub async fn dashboard(&self, today: NaiveDate) -> Result<Dashboard, ReportError> {
        let yesterday = today - Days::new(1);
        let this_week_start = week_start(today);
        let month_start = month_key(today).first_day();
        let trend_start = this_week_start - Days::new(28);
        let start = month_start.min(trend_start);
        let end = today + Days::new(1);

        let (month_rate, rate_degraded) = self.rate_or_zero(month_key(today), today).await?;
        let Some((purchases, productions)) = self.fetch_range(start, end).await? else {
            return Ok(Dashboard::zeroed(true));
        };

        let meals_on = |date: NaiveDate| -> u64 {
            productions
                .iter()
                .filter(|p| p.production_date == date)
                .map(|p| u64::from(p.patients_served))
                .sum()
        };
        let yesterday_meals = meals_on(yesterday);

        let mut week_to_date = week_bucket(today);
        week_to_date.end = end;
        let week_metric = aggregate(&week_to_date, &purchases, &productions, &month_rate, None);

        let mut month_to_date = month_bucket(month_key(today));
        month_to_date.end = end;
        let month_metric = aggregate(&month_to_date, &purchases, &productions, &month_rate, None);

        let mut by_facility: HashMap<FacilityId, u64> = HashMap::new();
        for p in productions.iter().filter(|p| p.production_date == yesterday) {
            *by_facility.entry(p.facility_id).or_default() += u64::from(p.patients_served);
        }
        let mut facility_contribution: Vec<FacilityShare> = by_facility
            .into_iter()
            .map(|(facility_id, meals)| FacilityShare {
                facility_id,
                meals,
                percentage: if yesterday_meals > 0 {
                    round1(meals as f64 / yesterday_meals as f64 * 100.0)
                } else {
                    0.0
                },
            })
            .collect();
        facility_contribution.sort_by(|a, b| {
            b.meals
                .cmp(&a.meals)
                .then_with(|| a.facility_id.as_uuid().cmp(b.facility_id.as_uuid()))
        });

        let mut day_points = Vec::with_capacity(7);
        for offset in (0..7u64).rev() {
            let date = today - Days::new(offset);
            day_points.push((date.format("%a").to_string(), meals_on(date) as f64));
        }

        let mut rates = HashMap::from([(month_key(today), month_rate)]);
        let mut degraded = rate_degraded;
        let mut week_points = Vec::with_capacity(5);
        for i in 0..5u64 {
            let bucket = week_bucket(trend_start + Days::new(7 * i));
            let (rate, week_rate_degraded) =
                self.month_rate_memo(&mut rates, month_key(bucket.start), today).await?;
            degraded |= week_rate_degraded;
            let metric = aggregate(&bucket, &purchases, &productions, &rate, None);
            week_points.push((format!("W{}", i + 1), metric.total_cpm));
        }

        Ok(Dashboard {
            yesterday_meals,
            week_to_date_meals: week_metric.total_meals,
            current_week_cpm: week_metric.total_cpm,
            month_to_date_cpm: month_metric.total_cpm,
            facility_contribution,
            seven_day_trend: trend_series(day_points),
            week_cpm_trend: trend_series(week_points),
            degraded,
        })
    }

    /// Detailed view of one month's own overhead (not the carried rate).
    pub async fn indirect_cost_breakdown(
        &self,
        year: i32,
        month: u32,
    ) -> Result<IndirectCostBreakdown, ReportError> {
        let key = MonthKey::new(year, month)?;
        let (start, end) = key.bounds();
        match tokio::try_join!(
            self.store.indirect_costs(key.year, key.month),
            self.store.productions(start, end),
        ) {
            Ok((costs, productions)) => {
                let total_meals =
                    productions.iter().map(|p| u64::from(p.patients_served)).sum();
                Ok(breakdown(&costs, total_meals))
            }
            Err(err) => match self.mode {
                FetchMode::Strict => Err(err.into()),
                FetchMode::BestEffort => {
                    warn!(%err, year, month, "breakdown fetch failed, serving zeroed view");
                    Ok(IndirectCostBreakdown::degraded())
                }
            },
        }
    }

    /// Purchases and productions for `[start, end)`, fetched concurrently.
    /// `None` means the fetch failed and best-effort mode swallowed it.
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<(Vec<PurchaseRecord>, Vec<ProductionRecord>)>, ReportError> {
        ensure_range(start, end)?;
        match tokio::try_join!(self.store.purchases(start, end), self.store.productions(start, end))
        {
            Ok(pair) => Ok(Some(pair)),
            Err(err) => match self.mode {
                FetchMode::Strict => Err(err.into()),
                FetchMode::BestEffort => {
                    warn!(%err, %start, %end, "range fetch failed, zeroing affected buckets");
                    Ok(None)
                }
            },
        }
    }

    async fn month_rate_memo(
        &self,
        memo: &mut HashMap<MonthKey, OverheadRate>,
        key: MonthKey,
        today: NaiveDate,
    ) -> Result<(OverheadRate, bool), ReportError> {
        if let Some(rate) = memo.get(&key) {
            return Ok((*rate, false));
        }
        let (rate, degraded) = self.rate_or_zero(key, today).await?;
        memo.insert(key, rate);
        Ok((rate, degraded))
    }

    async fn rate_or_zero(
        &self,
        key: MonthKey,
        today: NaiveDate,
    ) -> Result<(OverheadRate, bool), ReportError> {
        match self.overhead.rate_for(key, today).await {
            Ok(rate) => Ok((rate, false)),
            Err(err) => match self.mode {
                FetchMode::Strict => Err(err.into()),
                FetchMode::BestEffort => {
                    warn!(%err, year = key.year, month = key.month, "overhead rate unavailable, using zero");
                    Ok((OverheadRate::zero(key), true))
                }
            },
        }
    }
}

fn days_of(bucket: &PeriodBucket) -> impl Iterator<Item = NaiveDate> + '_ {
    bucket.start.iter_days().take_while(|d| *d < bucket.end)
}
