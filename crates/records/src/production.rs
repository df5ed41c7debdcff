use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mealcost_core::{DomainError, DomainResult, FacilityId, MealService, RecordId};

/// Tolerance for the `total_kg = starch_kg + vegetables_kg` check.
const KG_TOLERANCE: f64 = 1e-6;

/// One day's meal production at a facility, for one service.
///
/// Carries two meal counts with different jobs:
/// - `patients_served` is the actual headcount, and the only denominator
///   financial aggregation is allowed to use;
/// - `meals_calculated` is a portion-coverage estimate (kg times
///   portions-per-kg), kept as an efficiency indicator and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub id: RecordId,
    pub facility_id: FacilityId,
    pub starch_kg: f64,
    pub vegetables_kg: f64,
    /// Always `starch_kg + vegetables_kg` (within 1e-6).
    pub total_kg: f64,
    pub starch_portion_per_kg: f64,
    pub veg_portion_per_kg: f64,
    /// Portion estimate; zero when either portion factor is zero.
    pub meals_calculated: u32,
    /// Authoritative headcount actually served.
    pub patients_served: u32,
    pub service: MealService,
    pub production_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ProductionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RecordId,
        facility_id: FacilityId,
        starch_kg: f64,
        vegetables_kg: f64,
        total_kg: f64,
        starch_portion_per_kg: f64,
        veg_portion_per_kg: f64,
        patients_served: u32,
        service: MealService,
        production_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        for (name, value) in [
            ("starch_kg", starch_kg),
            ("vegetables_kg", vegetables_kg),
            ("starch_portion_per_kg", starch_portion_per_kg),
            ("veg_portion_per_kg", veg_portion_per_kg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!("{name} must be >= 0")));
            }
        }
        if (total_kg - (starch_kg + vegetables_kg)).abs() > KG_TOLERANCE {
            return Err(DomainError::invariant(
                "total_kg must equal starch_kg + vegetables_kg",
            ));
        }

        let meals_calculated =
            portion_estimate(starch_kg, vegetables_kg, starch_portion_per_kg, veg_portion_per_kg);

        Ok(Self {
            id,
            facility_id,
            starch_kg,
            vegetables_kg,
            total_kg,
            starch_portion_per_kg,
            veg_portion_per_kg,
            meals_calculated,
            patients_served,
            service,
            production_date,
            created_at,
        })
    }
}

/// Portion-based meal estimate. Zero when either portion factor is zero,
/// since a half-configured recipe would otherwise undercount silently.
fn portion_estimate(starch_kg: f64, veg_kg: f64, starch_per_kg: f64, veg_per_kg: f64) -> u32 {
    if starch_per_kg == 0.0 || veg_per_kg == 0.0 {
        return 0;
    }
    (starch_kg * starch_per_kg + veg_kg * veg_per_kg).round() as u32
}
