//! Side-by-side comparison of two regimes for the same income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::engine::TaxEngine;
use crate::models::{Levies, Regime, RegimeSet, RegimeSetError, TaxResult};

/// Direction of the proposed value relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Lower,
    Higher,
    Unchanged,
}

impl Direction {
    fn between(
        current: Decimal,
        proposed: Decimal,
    ) -> Self {
        match proposed.cmp(&current) {
            std::cmp::Ordering::Less => Self::Lower,
            std::cmp::Ordering::Greater => Self::Higher,
            std::cmp::Ordering::Equal => Self::Unchanged,
        }
    }
}

/// Summary rows that can differ between two regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryField {
    BaseTax,
    TaxAfterRebate,
    Surcharge,
    Cess,
    TotalTax,
    EffectiveRate,
}

impl SummaryField {
    pub const ALL: [SummaryField; 6] = [
        Self::BaseTax,
        Self::TaxAfterRebate,
        Self::Surcharge,
        Self::Cess,
        Self::TotalTax,
        Self::EffectiveRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseTax => "Base Tax",
            Self::TaxAfterRebate => "Tax After Rebate",
            Self::Surcharge => "Surcharge",
            Self::Cess => "Health & Education Cess",
            Self::TotalTax => "Total Tax",
            Self::EffectiveRate => "Effective Tax Rate",
        }
    }

    fn value(
        &self,
        result: &TaxResult,
    ) -> Decimal {
        match self {
            Self::BaseTax => result.base_tax,
            Self::TaxAfterRebate => result.tax_after_rebate,
            Self::Surcharge => result.surcharge,
            Self::Cess => result.cess,
            Self::TotalTax => result.total_tax,
            Self::EffectiveRate => result.effective_rate_percent,
        }
    }
}

/// One summary row compared across both regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub field: SummaryField,
    pub current: Decimal,
    pub proposed: Decimal,
    pub direction: Direction,
}

/// Outcome of moving from the current to the proposed regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The proposed regime is cheaper by this amount.
    Saves(Decimal),
    /// The proposed regime costs this much more (possibly zero).
    CostsMore(Decimal),
}

/// Results for one income under two regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub current: TaxResult,
    pub proposed: TaxResult,
}

impl RegimeComparison {
    /// Current total minus proposed total; positive when the proposed regime
    /// is cheaper.
    pub fn savings(&self) -> Decimal {
        self.current.total_tax - self.proposed.total_tax
    }

    /// Equal totals count as "costs more" by zero.
    pub fn verdict(&self) -> Verdict {
        let savings = self.savings();
        if savings > Decimal::ZERO {
            Verdict::Saves(savings)
        } else {
            Verdict::CostsMore(-savings)
        }
    }

    /// Every summary row with its direction of change.
    pub fn deltas(&self) -> Vec<Delta> {
        SummaryField::ALL
            .iter()
            .map(|field| self.delta(*field))
            .collect()
    }

    pub fn delta(
        &self,
        field: SummaryField,
    ) -> Delta {
        let current = field.value(&self.current);
        let proposed = field.value(&self.proposed);
        Delta {
            field,
            current,
            proposed,
            direction: Direction::between(current, proposed),
        }
    }
}

/// Computes both regimes for `gross_income` and pairs the results.
///
/// ```
/// use rust_decimal_macros::dec;
/// use regime_core::calculations::{Verdict, compare_regimes};
/// use regime_core::presets::{self, PresetRegime};
///
/// let comparison = compare_regimes(
///     dec!(1500000),
///     &PresetRegime::Current.regime(),
///     &PresetRegime::Proposed.regime(),
///     &presets::levies(),
/// );
///
/// assert_eq!(comparison.verdict(), Verdict::Saves(dec!(44200)));
/// ```
pub fn compare_regimes(
    gross_income: Decimal,
    current: &Regime,
    proposed: &Regime,
    levies: &Levies,
) -> RegimeComparison {
    RegimeComparison {
        current: TaxEngine::for_regime(current, levies).calculate(gross_income),
        proposed: TaxEngine::for_regime(proposed, levies).calculate(gross_income),
    }
}

impl RegimeSet {
    /// Computes tax for `gross_income` under the named regime.
    ///
    /// # Errors
    ///
    /// Returns [`RegimeSetError::UnknownRegime`] if no regime has that name.
    pub fn compute(
        &self,
        name: &str,
        gross_income: Decimal,
    ) -> Result<TaxResult, RegimeSetError> {
        let regime = self.get(name)?;
        Ok(TaxEngine::for_regime(regime, self.levies()).calculate(gross_income))
    }

    /// Compares two named regimes for the same income.
    ///
    /// # Errors
    ///
    /// Returns [`RegimeSetError::UnknownRegime`] if either name is missing.
    pub fn compare(
        &self,
        gross_income: Decimal,
        baseline: &str,
        candidate: &str,
    ) -> Result<RegimeComparison, RegimeSetError> {
        let current = self.get(baseline)?;
        let proposed = self.get(candidate)?;
        Ok(compare_regimes(
            gross_income,
            current,
            proposed,
            self.levies(),
        ))
    }
}
