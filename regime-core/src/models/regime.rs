use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tax_slab::{SlabTable, SurchargeTable};
use crate::calculations::common::MAX_INCOME;

/// Errors raised when assembling or querying a [`RegimeSet`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegimeSetError {
    #[error("unknown regime '{0}'")]
    UnknownRegime(String),

    #[error("regime '{0}' is defined more than once")]
    DuplicateRegime(String),
}

/// Errors raised when building a [`RegimeConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegimeConfigError {
    /// Deduction, rebate limit and rebate cap are all amounts of money and
    /// must lie within `0..=MAX_INCOME`.
    #[error("{field} is {value}, expected a value between 0 and {max}", max = MAX_INCOME)]
    OutOfRange { field: &'static str, value: Decimal },
}

/// Per-regime constants that sit alongside the slab table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Flat deduction subtracted from gross income before the slab walk.
    pub standard_deduction: Decimal,

    /// Taxable income at or below which the rebate applies in full.
    pub rebate_eligibility_limit: Decimal,

    /// Largest rebate granted, capped at the computed base tax.
    pub max_rebate: Decimal,
}

impl RegimeConfig {
    /// Builds a config, rejecting negative or oversized amounts.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use regime_core::{RegimeConfig, RegimeConfigError};
    ///
    /// let config = RegimeConfig::new(dec!(50000), dec!(700000), dec!(25000));
    /// assert!(config.is_ok());
    ///
    /// let negative = RegimeConfig::new(dec!(50000), dec!(700000), dec!(-1));
    /// assert!(matches!(negative, Err(RegimeConfigError::OutOfRange { field: "max_rebate", .. })));
    /// ```
    pub fn new(
        standard_deduction: Decimal,
        rebate_eligibility_limit: Decimal,
        max_rebate: Decimal,
    ) -> Result<Self, RegimeConfigError> {
        for (field, value) in [
            ("standard_deduction", standard_deduction),
            ("rebate_eligibility_limit", rebate_eligibility_limit),
            ("max_rebate", max_rebate),
        ] {
            if !(Decimal::ZERO..=MAX_INCOME).contains(&value) {
                return Err(RegimeConfigError::OutOfRange { field, value });
            }
        }

        Ok(Self {
            standard_deduction,
            rebate_eligibility_limit,
            max_rebate,
        })
    }
}

/// A named tax regime: its slab table plus the rebate rules that go with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regime {
    /// Short identifier used for lookups (e.g. `"current"`).
    pub name: String,

    /// Human-readable heading.
    pub label: String,

    pub slabs: SlabTable,

    pub config: RegimeConfig,
}

/// Levies applied on top of every regime's tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Levies {
    /// Surcharge tiers keyed on gross income.
    pub surcharge: SurchargeTable,

    /// Flat cess on tax plus surcharge, as a fraction.
    pub cess_rate: Decimal,
}

/// Any number of named regimes sharing one set of levies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeSet {
    levies: Levies,
    regimes: Vec<Regime>,
}

impl RegimeSet {
    /// Builds a set, rejecting duplicate regime names.
    ///
    /// # Errors
    ///
    /// Returns [`RegimeSetError::DuplicateRegime`] if two regimes share a name.
    pub fn new(
        levies: Levies,
        regimes: Vec<Regime>,
    ) -> Result<Self, RegimeSetError> {
        for (index, regime) in regimes.iter().enumerate() {
            if regimes[..index].iter().any(|r| r.name == regime.name) {
                return Err(RegimeSetError::DuplicateRegime(regime.name.clone()));
            }
        }

        Ok(Self { levies, regimes })
    }

    pub fn levies(&self) -> &Levies {
        &self.levies
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    /// Looks up a regime by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegimeSetError::UnknownRegime`] if no regime has that name.
    pub fn get(
        &self,
        name: &str,
    ) -> Result<&Regime, RegimeSetError> {
        self.regimes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| RegimeSetError::UnknownRegime(name.to_string()))
    }

    /// Replaces the slab table of an existing regime.
    ///
    /// # Errors
    ///
    /// Returns [`RegimeSetError::UnknownRegime`] if no regime has that name.
    pub fn replace_slabs(
        &mut self,
        name: &str,
        slabs: SlabTable,
    ) -> Result<(), RegimeSetError> {
        let regime = self
            .regimes
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| RegimeSetError::UnknownRegime(name.to_string()))?;
        regime.slabs = slabs;
        Ok(())
    }

    /// Replaces the surcharge tiers shared by all regimes.
    pub fn replace_surcharge(
        &mut self,
        surcharge: SurchargeTable,
    ) {
        self.levies.surcharge = surcharge;
    }
}
