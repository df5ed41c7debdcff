use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mealcost_core::{DomainError, DomainResult, IngredientId, MealService, RecordId, round2};

/// Unit an ingredient is bought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngredientUnit {
    Kg,
    Ltr,
    Pcs,
}

/// A raw-ingredient purchase.
///
/// Immutable once persisted; corrections in the surrounding application go
/// through delete + recreate, so [`PurchaseRecord::new`] is the only
/// validation point. `total_price` is derived there, never taken on trust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: RecordId,
    pub ingredient_id: IngredientId,
    pub unit: IngredientUnit,
    pub quantity: f64,
    pub unit_price: f64,
    /// Always `round2(quantity * unit_price)`.
    pub total_price: f64,
    /// Meal service the purchase was made for, when tagged.
    pub service: Option<MealService>,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl PurchaseRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RecordId,
        ingredient_id: IngredientId,
        unit: IngredientUnit,
        quantity: f64,
        unit_price: f64,
        service: Option<MealService>,
        purchase_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(DomainError::validation("quantity must be >= 0"));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(DomainError::validation("unit price must be >= 0"));
        }

        Ok(Self {
            id,
            ingredient_id,
            unit,
            quantity,
            unit_price,
            total_price: round2(quantity * unit_price),
            service,
            purchase_date,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn purchase(quantity: f64, unit_price: f64) -> DomainResult<PurchaseRecord> {
        PurchaseRecord::new(
            RecordId::new(),
            IngredientId::new(),
            IngredientUnit::Kg,
            quantity,
            unit_price,
            Some(MealService::Lunch),
            date(2026, 3, 4),
            Utc::now(),
        )
    }

    #[test]
    fn total_price_is_derived_and_rounded() {
        let p = purchase(3.333, 100.0).unwrap();
        assert_eq!(p.total_price, 333.3);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = purchase(-1.0, 100.0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        assert!(purchase(1.0, -0.01).is_err());
    }

    proptest! {
        /// The pricing invariant holds for any accepted quantity/price pair.
        #[test]
        fn total_price_invariant(quantity in 0.0f64..10_000.0, unit_price in 0.0f64..1_000_000.0) {
            let p = purchase(quantity, unit_price).unwrap();
            prop_assert_eq!(p.total_price, mealcost_core::round2(quantity * unit_price));
        }
    }
}
