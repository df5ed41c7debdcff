use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mealcost_core::{DomainError, DomainResult, RecordId};

/// One line of a month's indirect overhead (utilities, salaries, transport...).
///
/// Booked against a `(year, month)` pair rather than a date: overhead is a
/// monthly figure and only ever aggregates at month granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCostRecord {
    pub id: RecordId,
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub description: String,
    pub amount: f64,
    /// Optional ledger code, e.g. "61110".
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl IndirectCostRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RecordId,
        year: i32,
        month: u32,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        code: Option<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation("month must be in 1..=12"));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation("amount must be >= 0"));
        }
        let category = category.into();
        if category.is_empty() {
            return Err(DomainError::validation("category must not be empty"));
        }

        Ok(Self {
            id,
            year,
            month,
            category,
            description: description.into(),
            amount,
            code,
            created_at,
        })
    }

    /// Key used when grouping breakdown lines: `code_category` when a
    /// ledger code exists, the bare category otherwise.
    pub fn grouping_key(&self) -> String {
        match &self.code {
            Some(code) => format!("{}_{}", code, self.category),
            None => self.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(month: u32, amount: f64, code: Option<&str>) -> DomainResult<IndirectCostRecord> {
        IndirectCostRecord::new(
            RecordId::new(),
            2026,
            month,
            "Utilities",
            "Electricity",
            amount,
            code.map(str::to_owned),
            Utc::now(),
        )
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(cost(0, 100.0, None).is_err());
        assert!(cost(13, 100.0, None).is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(cost(3, -5.0, None).is_err());
    }

    #[test]
    fn grouping_key_prefers_the_ledger_code() {
        assert_eq!(cost(3, 100.0, Some("61110")).unwrap().grouping_key(), "61110_Utilities");
        assert_eq!(cost(3, 100.0, None).unwrap().grouping_key(), "Utilities");
    }
}
