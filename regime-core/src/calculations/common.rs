//! Common helpers shared by the tax engine and its callers.
//!
//! These cover the input boundary (turning whatever the caller has into a
//! usable non-negative income) and the rounding used when amounts are shown.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

/// Largest income the engine will work with. Anything above is clamped so
/// that surcharge and cess arithmetic cannot overflow [`Decimal`].
pub const MAX_INCOME: Decimal = dec!(1000000000000000000000000);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(9.70666)), dec!(9.71));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole currency units, half-up.
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(26000.104)), dec!(26000));
/// assert_eq!(round_whole(dec!(0.5)), dec!(1));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps an income into `0..=MAX_INCOME`.
///
/// Negative income is treated as zero. No error is raised; callers are
/// expected to have sanitized free text already.
pub fn clamp_income(income: Decimal) -> Decimal {
    if income < Decimal::ZERO {
        warn!(income = %income, "negative income clamped to zero");
        Decimal::ZERO
    } else if income > MAX_INCOME {
        warn!(income = %income, max = %MAX_INCOME, "income clamped to supported maximum");
        MAX_INCOME
    } else {
        income
    }
}

/// Converts a raw floating-point income into a [`Decimal`].
///
/// Non-finite and negative values become zero. Finite values too large for
/// a [`Decimal`] are clamped to [`MAX_INCOME`] like any other large income.
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::common::{MAX_INCOME, sanitize_income};
///
/// assert_eq!(sanitize_income(1500000.0), dec!(1500000));
/// assert_eq!(sanitize_income(f64::NAN), dec!(0));
/// assert_eq!(sanitize_income(-10.0), dec!(0));
/// assert_eq!(sanitize_income(1e300), MAX_INCOME);
/// ```
pub fn sanitize_income(raw: f64) -> Decimal {
    if !raw.is_finite() {
        warn!(raw, "non-finite income treated as zero");
        return Decimal::ZERO;
    }
    if raw < 0.0 {
        warn!(raw, "negative income clamped to zero");
        return Decimal::ZERO;
    }

    match Decimal::from_f64(raw) {
        Some(income) => clamp_income(income),
        None => {
            warn!(raw, max = %MAX_INCOME, "income clamped to supported maximum");
            MAX_INCOME
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_handles_zero() {
        assert_eq!(round_half_up(dec!(0)), dec!(0.00));
    }

    // =========================================================================
    // round_whole tests
    // =========================================================================

    #[test]
    fn round_whole_drops_fraction() {
        assert_eq!(round_whole(dec!(145600.49)), dec!(145600));
        assert_eq!(round_whole(dec!(145600.50)), dec!(145601));
    }

    // =========================================================================
    // clamp_income tests
    // =========================================================================

    #[test]
    fn clamp_income_keeps_valid_income() {
        assert_eq!(clamp_income(dec!(1500000)), dec!(1500000));
    }

    #[test]
    fn clamp_income_zeroes_negative_income() {
        assert_eq!(clamp_income(dec!(-1)), Decimal::ZERO);
    }

    #[test]
    fn clamp_income_caps_huge_income() {
        assert_eq!(clamp_income(Decimal::MAX), MAX_INCOME);
    }

    #[test]
    fn max_income_is_ten_to_the_twenty_fourth() {
        assert_eq!(MAX_INCOME, Decimal::from_i128_with_scale(10_i128.pow(24), 0));
    }

    // =========================================================================
    // sanitize_income tests
    // =========================================================================

    #[test]
    fn sanitize_income_accepts_finite_positive_values() {
        assert_eq!(sanitize_income(750000.0), dec!(750000));
    }

    #[test]
    fn sanitize_income_zeroes_non_finite_values() {
        assert_eq!(sanitize_income(f64::INFINITY), Decimal::ZERO);
        assert_eq!(sanitize_income(f64::NEG_INFINITY), Decimal::ZERO);
        assert_eq!(sanitize_income(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn sanitize_income_zeroes_negative_values() {
        assert_eq!(sanitize_income(-0.01), Decimal::ZERO);
    }

    #[test]
    fn sanitize_income_clamps_values_too_large_for_decimal() {
        assert_eq!(sanitize_income(1e29), MAX_INCOME);
        assert_eq!(sanitize_income(1e300), MAX_INCOME);
        assert_eq!(sanitize_income(f64::MAX), MAX_INCOME);
    }

    #[test]
    fn sanitize_income_is_monotonic_across_the_clamp() {
        let raws = [1e23, 1e24, 1e25, 1e28, 1e29, 1e100, f64::MAX];

        let incomes: Vec<Decimal> = raws.iter().map(|r| sanitize_income(*r)).collect();

        for pair in incomes.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
        assert_eq!(incomes.last(), Some(&MAX_INCOME));
    }
}
