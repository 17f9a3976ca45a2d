//! Progressive slab tax computation.
//!
//! [`TaxEngine`] turns one gross income into a [`TaxResult`] for one regime.
//! The steps run in a fixed order:
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Gross income, clamped to zero or above |
//! | 2    | Taxable income (gross minus standard deduction, minimum 0) |
//! | 3    | Base tax from the cumulative slab walk, with one breakdown line per taxed slab |
//! | 4    | Rebate (full relief up to the cap when taxable income is within the limit) |
//! | 5    | Tax after rebate (step 3 minus step 4) |
//! | 6    | Surcharge (step 5 times the surcharge tier rate for *gross* income) |
//! | 7    | Cess (steps 5 + 6 times the cess rate) |
//! | 8    | Total tax (steps 5 + 6 + 7) and effective rate |
//!
//! The computation is total: every input yields a result and nothing is
//! signaled as an error.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use regime_core::calculations::TaxEngine;
//! use regime_core::presets::{self, PresetRegime};
//!
//! let regime = PresetRegime::Current.regime();
//! let levies = presets::levies();
//!
//! let result = TaxEngine::for_regime(&regime, &levies).calculate(dec!(1500000));
//!
//! assert_eq!(result.taxable_income, dec!(1450000));
//! assert_eq!(result.base_tax, dec!(140000));
//! assert_eq!(result.cess, dec!(5600));
//! assert_eq!(result.total_tax, dec!(145600));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{MAX_INCOME, clamp_income};
use crate::models::{
    Levies, Regime, RegimeConfig, SlabTable, SurchargeTable, TaxBreakdownLine, TaxResult,
};

/// Calculator for a single regime.
///
/// Borrows the slab table, regime constants and levies; holds no state of
/// its own, so one engine can be reused for any number of incomes.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    slabs: &'a SlabTable,
    config: &'a RegimeConfig,
    surcharge: &'a SurchargeTable,
    cess_rate: Decimal,
}

impl<'a> TaxEngine<'a> {
    pub fn new(
        slabs: &'a SlabTable,
        config: &'a RegimeConfig,
        surcharge: &'a SurchargeTable,
        cess_rate: Decimal,
    ) -> Self {
        Self {
            slabs,
            config,
            surcharge,
            cess_rate,
        }
    }

    /// Engine for a named regime under the shared levies.
    pub fn for_regime(
        regime: &'a Regime,
        levies: &'a Levies,
    ) -> Self {
        Self::new(
            &regime.slabs,
            &regime.config,
            &levies.surcharge,
            levies.cess_rate,
        )
    }

    /// Computes the full result for `gross_income`.
    pub fn calculate(
        &self,
        gross_income: Decimal,
    ) -> TaxResult {
        let gross_income = clamp_income(gross_income);

        let taxable_income = self.taxable_income(gross_income);

        let (base_tax, slabwise_tax) = self.slab_walk(taxable_income);

        let rebate = self.rebate(taxable_income, base_tax);
        let tax_after_rebate = base_tax - rebate;

        let surcharge = tax_after_rebate * self.surcharge_rate(gross_income);
        let cess = self.cess(tax_after_rebate, surcharge);

        let total_tax = tax_after_rebate + surcharge + cess;
        let effective_rate_percent = effective_rate(total_tax, gross_income);

        debug!(
            gross_income = %gross_income,
            taxable_income = %taxable_income,
            base_tax = %base_tax,
            rebate = %rebate,
            surcharge = %surcharge,
            cess = %cess,
            total_tax = %total_tax,
            "computed tax"
        );

        TaxResult {
            gross_income,
            standard_deduction: self.config.standard_deduction,
            taxable_income,
            slabwise_tax,
            base_tax,
            rebate,
            tax_after_rebate,
            surcharge,
            cess,
            total_tax,
            effective_rate_percent,
        }
    }

    /// Gross income less the standard deduction, never below zero.
    ///
    /// The deduction is held to `0..=MAX_INCOME` so a config assembled by
    /// hand cannot raise taxable income above gross or overflow.
    fn taxable_income(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        let deduction = self.config.standard_deduction.clamp(Decimal::ZERO, MAX_INCOME);
        (gross_income - deduction).max(Decimal::ZERO)
    }

    /// Walks the slabs in ascending order, taxing each bracket's share of
    /// `taxable_income`.
    ///
    /// Returns the base tax and the breakdown lines. The walk stops as soon
    /// as no income remains, so no line is produced past the income present.
    fn slab_walk(
        &self,
        taxable_income: Decimal,
    ) -> (Decimal, Vec<TaxBreakdownLine>) {
        let mut remaining = taxable_income;
        let mut previous_bound = Decimal::ZERO;
        let mut base_tax = Decimal::ZERO;
        let mut lines = Vec::new();

        for slab in self.slabs.slabs() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxed_income = match slab.upper_bound {
                Some(bound) => remaining.min(bound - previous_bound),
                None => remaining,
            };
            let amount = taxed_income * slab.rate;

            if taxed_income > Decimal::ZERO {
                lines.push(TaxBreakdownLine {
                    lower_bound: previous_bound,
                    upper_bound: slab.upper_bound,
                    rate: slab.rate,
                    taxed_income,
                    amount,
                });
            }

            base_tax += amount;
            remaining -= taxed_income;

            if let Some(bound) = slab.upper_bound {
                previous_bound = bound;
            }
        }

        (base_tax, lines)
    }

    /// Full rebate up to the cap when taxable income is within the limit.
    ///
    /// There is no phase-out: one unit above the limit and the rebate is zero.
    fn rebate(
        &self,
        taxable_income: Decimal,
        base_tax: Decimal,
    ) -> Decimal {
        if taxable_income <= self.config.rebate_eligibility_limit {
            base_tax.min(self.config.max_rebate).max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    /// Surcharge tier rate, looked up on gross income rather than taxable
    /// income.
    fn surcharge_rate(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        self.surcharge.rate_for(gross_income)
    }

    fn cess(
        &self,
        tax_after_rebate: Decimal,
        surcharge: Decimal,
    ) -> Decimal {
        (tax_after_rebate + surcharge) * self.cess_rate
    }
}

/// Total tax as a percentage of gross income; zero for zero income.
fn effective_rate(
    total_tax: Decimal,
    gross_income: Decimal,
) -> Decimal {
    if gross_income > Decimal::ZERO {
        total_tax / gross_income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Computes tax for one income under one slab table.
///
/// Free-function form of [`TaxEngine::calculate`] taking every input
/// explicitly.
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::compute_tax;
/// use regime_core::presets::{self, PresetRegime};
///
/// let regime = PresetRegime::Proposed.regime();
/// let result = compute_tax(
///     dec!(1500000),
///     &regime.slabs,
///     &regime.config,
///     &presets::surcharge_table(),
///     presets::CESS_RATE,
/// );
///
/// assert_eq!(result.total_tax, dec!(101400));
/// ```
pub fn compute_tax(
    gross_income: Decimal,
    slab_table: &SlabTable,
    regime_config: &RegimeConfig,
    surcharge_table: &SurchargeTable,
    cess_rate: Decimal,
) -> TaxResult {
    TaxEngine::new(slab_table, regime_config, surcharge_table, cess_rate).calculate(gross_income)
}
