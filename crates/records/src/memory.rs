//! In-memory record store, used by tests and fixtures.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::store::{FetchResult, RecordStore};
use crate::{IndirectCostRecord, ProductionRecord, PurchaseRecord};

/// Straightforward vector-backed [`RecordStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    purchases: Vec<PurchaseRecord>,
    productions: Vec<ProductionRecord>,
    indirect_costs: Vec<IndirectCostRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_purchase(&mut self, record: PurchaseRecord) {
        self.purchases.push(record);
    }

    pub fn push_production(&mut self, record: ProductionRecord) {
        self.productions.push(record);
    }

    pub fn push_indirect_cost(&mut self, record: IndirectCostRecord) {
        self.indirect_costs.push(record);
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn purchases(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<PurchaseRecord>> {
        Ok(self
            .purchases
            .iter()
            .filter(|p| start <= p.purchase_date && p.purchase_date < end)
            .cloned()
            .collect())
    }

    async fn productions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<ProductionRecord>> {
        Ok(self
            .productions
            .iter()
            .filter(|p| start <= p.production_date && p.production_date < end)
            .cloned()
            .collect())
    }

    async fn indirect_costs(
        &self,
        year: i32,
        month: u32,
    ) -> FetchResult<Vec<IndirectCostRecord>> {
        Ok(self
            .indirect_costs
            .iter()
            .filter(|c| c.year == year && c.month == month)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use mealcost_core::{IngredientId, MealService, RecordId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn purchase_on(day: NaiveDate) -> PurchaseRecord {
        PurchaseRecord::new(
            RecordId::new(),
            IngredientId::new(),
            crate::IngredientUnit::Kg,
            2.0,
            500.0,
            Some(MealService::Lunch),
            day,
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn range_filter_is_half_open() {
        let mut store = InMemoryRecordStore::new();
        store.push_purchase(purchase_on(date(2026, 2, 28)));
        store.push_purchase(purchase_on(date(2026, 3, 1)));
        store.push_purchase(purchase_on(date(2026, 3, 31)));
        store.push_purchase(purchase_on(date(2026, 4, 1)));

        let march = store
            .purchases(date(2026, 3, 1), date(2026, 4, 1))
            .await
            .unwrap();
        assert_eq!(march.len(), 2);
        assert!(march.iter().all(|p| p.purchase_date.month() == 3));
    }
}
