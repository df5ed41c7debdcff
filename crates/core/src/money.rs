//! Money arithmetic helpers.
//!
//! Amounts are RWF values carried as `f64` and rounded to 2 decimals at the
//! points where the domain pins a rounding rule. Every division by a meal
//! count goes through [`per_meal`], so a zero denominator can never leak a
//! NaN or infinity into a report row that later gets summed or averaged.

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place, used for percentage displays.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Guarded per-meal division: `total / meals`, or `0.0` when `meals == 0`.
pub fn per_meal(total: f64, meals: u64) -> f64 {
    if meals == 0 {
        0.0
    } else {
        total / meals as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round2_pins_two_decimals() {
        assert_eq!(round2(65.704), 65.7);
        assert_eq!(round2(65.705), 65.71);
        assert_eq!(round2(200.0), 200.0);
        assert_eq!(round2(-1.005), -1.01);
    }

    #[test]
    fn zero_meals_divides_to_zero() {
        assert_eq!(per_meal(300_000.0, 0), 0.0);
    }

    #[test]
    fn per_meal_divides_cost_by_headcount() {
        assert_eq!(per_meal(300_000.0, 1_500), 200.0);
    }

    proptest! {
        /// Guarded division never produces NaN or infinity.
        #[test]
        fn per_meal_is_always_finite(total in 0.0f64..1e12, meals in 0u64..10_000_000) {
            prop_assert!(per_meal(total, meals).is_finite());
        }

        /// Rounding is idempotent.
        #[test]
        fn round2_is_idempotent(value in -1e9f64..1e9) {
            let once = round2(value);
            prop_assert_eq!(once, round2(once));
        }
    }
}
