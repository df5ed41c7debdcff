//! `mealcost-period` — calendar bucketing.
//!
//! The single home of week numbering, bucket bounds and period
//! classification. Anything that needs a week number goes through
//! [`resolver::week_number`]; there is deliberately no second
//! implementation anywhere in the workspace.

pub mod bucket;
pub mod policy;
pub mod resolver;

pub use bucket::{PeriodBucket, PeriodKind};
pub use policy::{EditPolicy, PeriodClass, classify};
pub use resolver::{
    MonthKey, WeekKey, WeekWithinMonth, day_bucket, day_key, month_bucket, month_key, week_bucket,
    week_bucket_of, week_key, week_number, week_start, weeks_overlapping_month, year_bucket,
    year_key,
};
