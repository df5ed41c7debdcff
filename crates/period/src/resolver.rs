//! Date → bucket-key resolution.
//!
//! Week numbering predates this system and is pinned, not ISO-8601:
//! `week = ceil((day_of_year + weekday_of_jan1 + 1) / 7)` with Sunday = 0
//! weekday numbering and 1-based day-of-year. Weeks themselves run
//! Sunday–Saturday. The number is a label/key and the bounds are a
//! separate concern: the formula ticks over on Saturdays, so a bucket's
//! closing Saturday already carries the next number. Buckets are
//! therefore keyed by their *first* day throughout.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use mealcost_core::{DomainError, DomainResult};

use crate::bucket::{PeriodBucket, PeriodKind};

/// Key of a week bucket. Ordered by year, then week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

/// Key of a month bucket. Ordered by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Validating constructor for caller-supplied input.
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation("month must be in 1..=12"));
        }
        Ok(Self { year, month })
    }

    /// Constructor for month values already known to be in `1..=12`.
    pub fn from_parts(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    /// The previous calendar month, crossing the year boundary as needed.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        ymd(self.year, self.month, 1)
    }

    /// Half-open bounds: `[first day, first day of next month)`.
    pub fn bounds(self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.next().first_day())
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl core::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// Month keys stay far inside chrono's representable years, so these
// constructions cannot fail in practice.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("date within calendar range")
}

fn jan1(year: i32) -> NaiveDate {
    ymd(year, 1, 1)
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).expect("date within calendar range")
}

/// Day key: the date itself.
pub fn day_key(date: NaiveDate) -> NaiveDate {
    date
}

/// The pinned week-number formula. See the module docs.
pub fn week_number(date: NaiveDate) -> u32 {
    let day_of_year = date.ordinal();
    let jan1_weekday = jan1(date.year()).weekday().num_days_from_sunday();
    (day_of_year + jan1_weekday + 1).div_ceil(7)
}

pub fn week_key(date: NaiveDate) -> WeekKey {
    WeekKey { year: date.year(), week: week_number(date) }
}

pub fn month_key(date: NaiveDate) -> MonthKey {
    MonthKey::from_date(date)
}

pub fn year_key(date: NaiveDate) -> i32 {
    date.year()
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// One-day bucket.
pub fn day_bucket(date: NaiveDate) -> PeriodBucket {
    PeriodBucket {
        kind: PeriodKind::Day,
        start: date,
        end: add_days(date, 1),
        label: date.format("%Y-%m-%d").to_string(),
    }
}

/// The Sunday–Saturday week containing `date`. The label carries the
/// year/week key of the week's first day, so a week spilling into the next
/// year keeps the number it started with.
pub fn week_bucket(date: NaiveDate) -> PeriodBucket {
    let start = week_start(date);
    let key = week_key(start);
    PeriodBucket {
        kind: PeriodKind::Week,
        start,
        end: add_days(start, 7),
        label: format!("{}-W{}", key.year, key.week),
    }
}

/// The week bucket for a `(year, week number)` pair, or `NotFound` when no
/// day of that year carries the number.
pub fn week_bucket_of(year: i32, week: u32) -> DomainResult<PeriodBucket> {
    let first = jan1(year);
    let mut cursor = week_start(first);
    // 54 Sunday starts are enough to cover any year.
    for _ in 0..54 {
        let anchor = if cursor < first { first } else { cursor };
        if anchor.year() > year {
            break;
        }
        if week_number(anchor) == week {
            return Ok(week_bucket(anchor));
        }
        cursor = add_days(cursor, 7);
    }
    Err(DomainError::not_found())
}

pub fn month_bucket(key: MonthKey) -> PeriodBucket {
    let (start, end) = key.bounds();
    PeriodBucket { kind: PeriodKind::Month, start, end, label: key.to_string() }
}

pub fn year_bucket(year: i32) -> PeriodBucket {
    PeriodBucket {
        kind: PeriodKind::Year,
        start: jan1(year),
        end: jan1(year + 1),
        label: format!("{year}"),
    }
}

/// A Sunday–Saturday week together with its clip to one month.
///
/// A week straddling a month boundary appears in both months' reports,
/// each time clipped to only the days inside that month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWithinMonth {
    /// The full Sunday–Saturday week.
    pub week: PeriodBucket,
    /// The same week restricted to the target month's days.
    pub clipped: PeriodBucket,
}

/// All Sunday–Saturday weeks overlapping a month, oldest first, each with
/// its month clip.
pub fn weeks_overlapping_month(key: MonthKey) -> Vec<WeekWithinMonth> {
    let (month_start, month_end) = key.bounds();
    let mut out = Vec::new();
    let mut cursor = week_start(month_start);
    while cursor < month_end {
        let week = week_bucket(cursor);
        let clipped = PeriodBucket {
            kind: PeriodKind::Week,
            start: week.start.max(month_start),
            end: week.end.min(month_end),
            label: week.label.clone(),
        };
        out.push(WeekWithinMonth { week, clipped });
        cursor = add_days(cursor, 7);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Known date → week-number pairs, spanning year boundaries. These pin
    /// the formula; any change here is a breaking change to report keys.
    #[test]
    fn week_number_fixture_table() {
        let fixtures = [
            // 2023 starts on a Sunday.
            (d(2023, 1, 1), 1),
            (d(2023, 1, 6), 1),
            (d(2023, 1, 7), 2),
            (d(2023, 12, 31), 53),
            // 2024 starts on a Monday.
            (d(2024, 1, 1), 1),
            (d(2024, 2, 4), 6),
            (d(2024, 12, 31), 53),
            // 2026 starts on a Thursday.
            (d(2026, 1, 1), 1),
            (d(2026, 1, 4), 2),
            (d(2026, 7, 15), 29),
        ];
        for (date, expected) in fixtures {
            assert_eq!(week_number(date), expected, "week number of {date}");
        }
    }

    #[test]
    fn week_buckets_run_sunday_to_saturday() {
        // 2026-01-07 is a Wednesday; its week is Sun 04 .. Sun 11 (exclusive).
        let week = week_bucket(d(2026, 1, 7));
        assert_eq!(week.start, d(2026, 1, 4));
        assert_eq!(week.end, d(2026, 1, 11));
        assert_eq!(week.days(), 7);
    }

    #[test]
    fn year_boundary_week_spills_and_keeps_its_key() {
        // Sun 2024-12-29 .. Sat 2025-01-04: one bucket, keyed in 2024.
        let week = week_bucket(d(2025, 1, 2));
        assert_eq!(week.start, d(2024, 12, 29));
        assert_eq!(week.end, d(2025, 1, 5));
        assert_eq!(week.label, "2024-W53");
    }

    #[test]
    fn week_bucket_of_round_trips_the_key() {
        for date in [d(2026, 1, 1), d(2026, 3, 15), d(2026, 12, 31)] {
            let key = week_key(date);
            let bucket = week_bucket_of(key.year, key.week).unwrap();
            assert!(bucket.contains(date), "{date} not in {}", bucket.label);
        }
    }

    #[test]
    fn unknown_week_number_is_not_found() {
        assert!(week_bucket_of(2026, 99).is_err());
    }

    #[test]
    fn month_key_prev_crosses_the_year() {
        assert_eq!(MonthKey::from_parts(2026, 1).prev(), MonthKey::from_parts(2025, 12));
        assert_eq!(MonthKey::from_parts(2026, 3).prev(), MonthKey::from_parts(2026, 2));
    }

    #[test]
    fn month_keys_order_by_year_then_month() {
        assert!(MonthKey::from_parts(2025, 12) < MonthKey::from_parts(2026, 1));
        assert!(MonthKey::from_parts(2026, 1) < MonthKey::from_parts(2026, 2));
    }

    #[test]
    fn straddling_week_is_clipped_differently_per_month() {
        // Jan 2023: last week is Sun 2023-01-29 .. Sat 2023-02-04.
        let jan = weeks_overlapping_month(MonthKey::from_parts(2023, 1));
        let last = jan.last().unwrap();
        assert_eq!(last.week.start, d(2023, 1, 29));
        assert_eq!(last.week.end, d(2023, 2, 5));
        assert_eq!(last.clipped.start, d(2023, 1, 29));
        assert_eq!(last.clipped.end, d(2023, 2, 1));

        // The same calendar week opens February's table, clipped the other way.
        let feb = weeks_overlapping_month(MonthKey::from_parts(2023, 2));
        let first = feb.first().unwrap();
        assert_eq!(first.week.start, d(2023, 1, 29));
        assert_eq!(first.clipped.start, d(2023, 2, 1));
        assert_eq!(first.clipped.end, d(2023, 2, 5));
    }

    #[test]
    fn interior_weeks_are_not_clipped() {
        let weeks = weeks_overlapping_month(MonthKey::from_parts(2026, 7));
        for w in &weeks {
            if w.week.start >= d(2026, 7, 1) && w.week.end <= d(2026, 8, 1) {
                assert_eq!(w.week, w.clipped);
            }
        }
    }
}
