use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mealcost_core::ValueObject;

/// Granularity of an aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Year,
}

/// A contiguous calendar period used as an aggregation unit.
///
/// `start..end` is half-open: `end` is the first day *after* the bucket.
/// Not persisted anywhere; buckets are recomputed from dates on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    pub kind: PeriodKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl ValueObject for PeriodBucket {}

impl PeriodBucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Half-open bounds, `[start, end)`.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
