//! Past/Current/Future classification of a bucket against wall-clock time.
//!
//! Nothing is stored or transitioned here: the class is recomputed on
//! every call from the date the caller supplies, so a bucket that was
//! `Current` yesterday simply classifies as `Past` today.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bucket::PeriodBucket;
use crate::resolver::{MonthKey, month_key};

/// Where a bucket sits relative to today, at month granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodClass {
    Past,
    Current,
    Future,
}

/// Classify a bucket by comparing the months it spans to today's month.
pub fn classify(bucket: &PeriodBucket, today: NaiveDate) -> PeriodClass {
    let now = month_key(today);
    let first = month_key(bucket.start);
    // `end` is exclusive, so the last covered month is end - 1 day.
    let last = month_key(bucket.end.pred_opt().unwrap_or(bucket.start));
    if last < now {
        PeriodClass::Past
    } else if first > now {
        PeriodClass::Future
    } else {
        PeriodClass::Current
    }
}

/// The one place edit rules live.
///
/// Callers on the write path ask `can_edit` instead of comparing dates
/// themselves; tightening the rules (e.g. freezing past months) is a
/// change to this value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPolicy {
    pub allow_past: bool,
    pub allow_current: bool,
    pub allow_future: bool,
}

impl Default for EditPolicy {
    /// Everything editable, matching current operational practice.
    fn default() -> Self {
        Self { allow_past: true, allow_current: true, allow_future: true }
    }
}

impl EditPolicy {
    /// A policy that freezes history once a month closes.
    pub const fn frozen_history() -> Self {
        Self { allow_past: false, allow_current: true, allow_future: true }
    }

    pub fn can_edit(&self, bucket: &PeriodBucket, today: NaiveDate) -> bool {
        match classify(bucket, today) {
            PeriodClass::Past => self.allow_past,
            PeriodClass::Current => self.allow_current,
            PeriodClass::Future => self.allow_future,
        }
    }

    /// Month-level convenience for write paths keyed by `(year, month)`.
    pub fn can_edit_month(&self, key: MonthKey, today: NaiveDate) -> bool {
        self.can_edit(&crate::resolver::month_bucket(key), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{day_bucket, month_bucket, week_bucket};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: fn() -> NaiveDate = || d(2026, 3, 14);

    #[test]
    fn months_classify_around_today() {
        let today = TODAY();
        assert_eq!(classify(&month_bucket(MonthKey::from_parts(2026, 2)), today), PeriodClass::Past);
        assert_eq!(
            classify(&month_bucket(MonthKey::from_parts(2026, 3)), today),
            PeriodClass::Current
        );
        assert_eq!(
            classify(&month_bucket(MonthKey::from_parts(2026, 4)), today),
            PeriodClass::Future
        );
    }

    #[test]
    fn any_day_of_the_current_month_is_current() {
        let today = TODAY();
        assert_eq!(classify(&day_bucket(d(2026, 3, 1)), today), PeriodClass::Current);
        assert_eq!(classify(&day_bucket(d(2026, 3, 31)), today), PeriodClass::Current);
        assert_eq!(classify(&day_bucket(d(2026, 2, 28)), today), PeriodClass::Past);
    }

    #[test]
    fn week_straddling_month_boundary_counts_as_current() {
        // Sun 2026-03-29 .. Sat 2026-04-04 touches the current month.
        let week = week_bucket(d(2026, 4, 1));
        assert_eq!(classify(&week, TODAY()), PeriodClass::Current);
    }

    #[test]
    fn default_policy_allows_everything() {
        let policy = EditPolicy::default();
        let today = TODAY();
        for key in [
            MonthKey::from_parts(2025, 12),
            MonthKey::from_parts(2026, 3),
            MonthKey::from_parts(2026, 7),
        ] {
            assert!(policy.can_edit_month(key, today));
        }
    }

    #[test]
    fn frozen_history_blocks_only_past_periods() {
        let policy = EditPolicy::frozen_history();
        let today = TODAY();
        assert!(!policy.can_edit_month(MonthKey::from_parts(2026, 2), today));
        assert!(policy.can_edit_month(MonthKey::from_parts(2026, 3), today));
        assert!(policy.can_edit_month(MonthKey::from_parts(2026, 4), today));
    }
}
