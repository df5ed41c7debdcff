//! `mealcost-report` — report assembly over the costing engine.
//!
//! Composes aggregator outputs into weekly/monthly/annual tables with
//! TOTAL and AVERAGE rows, trend series, the dashboard and the monthly
//! indirect-cost breakdown. [`ReportService`] is the async entry point
//! that orchestrates Record Store fetches; everything below it is pure.

pub mod assembler;
pub mod breakdown;
pub mod service;


pub use assembler::{TableSummary, TrendPoint, summarize, trend_series};
pub use breakdown::{IndirectCostBreakdown, IndirectCostLine, breakdown};
pub use service::{
    AnnualReport, Dashboard, FacilityShare, FetchMode, MonthlyReport, RangeReport, ReportError,
    ReportService, WeeklyReport,
};
