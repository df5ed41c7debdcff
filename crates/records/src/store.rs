//! Read-side boundary to the surrounding application's persistence.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::{IndirectCostRecord, ProductionRecord, PurchaseRecord};

/// Failure reaching or reading from the backing store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The store could not be reached at all.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something the schema rejects.
    #[error("malformed record from store: {0}")]
    Malformed(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Date-ranged read queries the costing engine consumes.
///
/// Ranges are half-open `[start, end)`. Implementations own all write
/// concurrency; the engine only ever reads, and the three queries are
/// independent enough to be issued concurrently for the same range.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn purchases(&self, start: NaiveDate, end: NaiveDate)
        -> FetchResult<Vec<PurchaseRecord>>;

    async fn productions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<ProductionRecord>>;

    async fn indirect_costs(&self, year: i32, month: u32)
        -> FetchResult<Vec<IndirectCostRecord>>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn purchases(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<PurchaseRecord>> {
        (**self).purchases(start, end).await
    }

    async fn productions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<ProductionRecord>> {
        (**self).productions(start, end).await
    }

    async fn indirect_costs(
        &self,
        year: i32,
        month: u32,
    ) -> FetchResult<Vec<IndirectCostRecord>> {
        (**self).indirect_costs(year, month).await
    }
}
