//! Behavioural checks of the engine against the Budget 2025 presets.

use pretty_assertions::assert_eq;
use regime_core::calculations::common::round_half_up;
use regime_core::presets::{self, PresetRegime};
use regime_core::{TaxEngine, TaxResult, compute_tax};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn compute(
    preset: PresetRegime,
    income: Decimal,
) -> TaxResult {
    let regime = preset.regime();
    let levies = presets::levies();
    TaxEngine::for_regime(&regime, &levies).calculate(income)
}

/// Incomes from zero to 6 crore in 25,000 steps, plus every interesting edge.
fn income_grid() -> Vec<Decimal> {
    let mut incomes: Vec<Decimal> = (0..=2400).map(|i| Decimal::from(i * 25_000)).collect();
    incomes.extend([
        dec!(749999),
        dec!(750000),
        dec!(750001),
        dec!(1250000),
        dec!(1250001),
        dec!(5000000),
        dec!(5000001),
        dec!(10000000),
        dec!(10000001),
        dec!(20000000),
        dec!(20000001),
        dec!(50000000),
        dec!(50000001),
    ]);
    incomes.sort();
    incomes
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn current_regime_at_fifteen_lakh() {
    let result = compute(PresetRegime::Current, dec!(1500000));

    assert_eq!(result.taxable_income, dec!(1450000));
    assert_eq!(result.standard_deduction, dec!(50000));
    assert_eq!(result.base_tax, dec!(140000));
    assert_eq!(result.rebate, dec!(0));
    assert_eq!(result.tax_after_rebate, dec!(140000));
    assert_eq!(result.surcharge, dec!(0));
    assert_eq!(result.cess, dec!(5600));
    assert_eq!(result.total_tax, dec!(145600));
    assert_eq!(round_half_up(result.effective_rate_percent), dec!(9.71));

    let amounts: Vec<_> = result.slabwise_tax.iter().map(|l| l.amount).collect();
    assert_eq!(
        amounts,
        vec![dec!(0), dec!(15000), dec!(30000), dec!(45000), dec!(50000)]
    );
    let labels: Vec<_> = result
        .slabwise_tax
        .iter()
        .map(|l| l.range_label())
        .collect();
    assert_eq!(
        labels,
        vec![
            "0 - 300000",
            "300000 - 600000",
            "600000 - 900000",
            "900000 - 1200000",
            "1200000 - 1500000",
        ]
    );
}

#[test]
fn proposed_regime_at_fifteen_lakh() {
    let result = compute(PresetRegime::Proposed, dec!(1500000));

    assert_eq!(result.taxable_income, dec!(1450000));
    assert_eq!(result.base_tax, dec!(97500));
    assert_eq!(result.rebate, dec!(0));
    assert_eq!(result.tax_after_rebate, dec!(97500));
    assert_eq!(result.surcharge, dec!(0));
    assert_eq!(result.cess, dec!(3900));
    assert_eq!(result.total_tax, dec!(101400));
    assert_eq!(result.slabwise_tax.len(), 4);
    assert_eq!(result.slabwise_tax[3].taxed_income, dec!(250000));
    assert_eq!(result.slabwise_tax[3].rate_percent(), "15%");
}

#[test]
fn proposed_regime_saves_against_current_at_fifteen_lakh() {
    let current = compute(PresetRegime::Current, dec!(1500000));
    let proposed = compute(PresetRegime::Proposed, dec!(1500000));

    assert_eq!(current.total_tax - proposed.total_tax, dec!(44200));
}

#[test]
fn zero_income_yields_zero_everywhere() {
    for preset in PresetRegime::ALL {
        let result = compute(preset, Decimal::ZERO);

        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.base_tax, Decimal::ZERO);
        assert_eq!(result.rebate, Decimal::ZERO);
        assert_eq!(result.tax_after_rebate, Decimal::ZERO);
        assert_eq!(result.surcharge, Decimal::ZERO);
        assert_eq!(result.cess, Decimal::ZERO);
        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.effective_rate_percent, Decimal::ZERO);
        assert!(result.slabwise_tax.is_empty());
    }
}

#[test]
fn current_regime_rebate_applies_at_exact_limit() {
    let result = compute(PresetRegime::Current, dec!(750000));

    assert_eq!(result.taxable_income, dec!(700000));
    // 0 + 300000 * 0.05 + 100000 * 0.10
    assert_eq!(result.base_tax, dec!(25000));
    assert_eq!(result.rebate, dec!(25000));
    assert_eq!(result.tax_after_rebate, dec!(0));
    assert_eq!(result.total_tax, dec!(0));
}

// =============================================================================
// Rebate cliff
// =============================================================================

#[test]
fn current_regime_rebate_disappears_one_unit_above_limit() {
    let at_limit = compute(PresetRegime::Current, dec!(750000));
    let above = compute(PresetRegime::Current, dec!(750001));

    assert_eq!(above.taxable_income, dec!(700001));
    assert_eq!(above.rebate, Decimal::ZERO);
    assert_eq!(above.tax_after_rebate, dec!(25000.1));
    assert_eq!(above.total_tax, dec!(26000.104));
    assert!(above.tax_after_rebate - at_limit.tax_after_rebate > dec!(25000));
}

#[test]
fn proposed_regime_rebate_cliff_at_twelve_lakh() {
    let at_limit = compute(PresetRegime::Proposed, dec!(1250000));
    let above = compute(PresetRegime::Proposed, dec!(1250001));

    assert_eq!(at_limit.taxable_income, dec!(1200000));
    assert_eq!(at_limit.base_tax, dec!(60000));
    assert_eq!(at_limit.rebate, dec!(60000));
    assert_eq!(at_limit.total_tax, Decimal::ZERO);

    assert_eq!(above.rebate, Decimal::ZERO);
    assert_eq!(above.tax_after_rebate, dec!(60000.15));
}

#[test]
fn rebate_never_exceeds_base_tax() {
    let result = compute(PresetRegime::Proposed, dec!(500000));

    // 50000 * 0.05 above the zero-rate slab
    assert_eq!(result.base_tax, dec!(2500));
    assert_eq!(result.rebate, dec!(2500));
    assert_eq!(result.tax_after_rebate, Decimal::ZERO);
}

// =============================================================================
// Surcharge boundaries (inclusive, keyed on gross income)
// =============================================================================

#[test]
fn surcharge_uses_tier_rate_at_each_bound() {
    let cases = [
        (dec!(5000000), dec!(0)),
        (dec!(5000001), dec!(0.10)),
        (dec!(10000000), dec!(0.10)),
        (dec!(10000001), dec!(0.15)),
        (dec!(20000000), dec!(0.15)),
        (dec!(20000001), dec!(0.25)),
        (dec!(50000000), dec!(0.25)),
        (dec!(50000001), dec!(0.37)),
    ];

    for (income, rate) in cases {
        let result = compute(PresetRegime::Current, income);

        assert_eq!(
            result.surcharge,
            result.tax_after_rebate * rate,
            "surcharge rate at income {income}"
        );
    }
}

#[test]
fn surcharge_bound_is_checked_against_gross_not_taxable_income() {
    // Taxable income is 5,000,000 exactly but gross income is above the tier.
    let result = compute(PresetRegime::Current, dec!(5050000));

    assert_eq!(result.taxable_income, dec!(5000000));
    assert_eq!(result.surcharge, result.tax_after_rebate * dec!(0.10));
}

#[test]
fn cess_applies_to_tax_plus_surcharge() {
    let result = compute(PresetRegime::Proposed, dec!(30000000));

    assert_eq!(
        result.cess,
        (result.tax_after_rebate + result.surcharge) * dec!(0.04)
    );
}

// =============================================================================
// Properties over an income grid
// =============================================================================

#[test]
fn amounts_are_non_negative_and_breakdown_sums_to_base_tax() {
    for preset in PresetRegime::ALL {
        for income in income_grid() {
            let result = compute(preset, income);
            let sum: Decimal = result.slabwise_tax.iter().map(|l| l.amount).sum();

            assert!(result.base_tax >= Decimal::ZERO);
            assert!(result.total_tax >= Decimal::ZERO);
            assert!(result.effective_rate_percent >= Decimal::ZERO);
            assert_eq!(sum, result.base_tax, "{preset:?} at {income}");
        }
    }
}

#[test]
fn breakdown_lines_never_exceed_taxable_income() {
    for preset in PresetRegime::ALL {
        for income in income_grid() {
            let result = compute(preset, income);
            let taxed: Decimal = result.slabwise_tax.iter().map(|l| l.taxed_income).sum();

            assert_eq!(taxed, result.taxable_income, "{preset:?} at {income}");
            assert!(
                result
                    .slabwise_tax
                    .iter()
                    .all(|l| l.taxed_income > Decimal::ZERO)
            );
        }
    }
}

#[test]
fn total_tax_is_monotonic_in_income() {
    for preset in PresetRegime::ALL {
        let mut previous = Decimal::ZERO;
        for income in income_grid() {
            let total = compute(preset, income).total_tax;

            assert!(
                total >= previous,
                "{preset:?}: total tax fell from {previous} to {total} at {income}"
            );
            previous = total;
        }
    }
}

#[test]
fn repeated_calls_are_identical() {
    let regime = PresetRegime::Current.regime();
    let surcharge = presets::surcharge_table();

    for income in [dec!(0), dec!(750000), dec!(1500000), dec!(75000000)] {
        let first = compute_tax(
            income,
            &regime.slabs,
            &regime.config,
            &surcharge,
            presets::CESS_RATE,
        );
        let second = compute_tax(
            income,
            &regime.slabs,
            &regime.config,
            &surcharge,
            presets::CESS_RATE,
        );

        assert_eq!(first, second);
    }
}
