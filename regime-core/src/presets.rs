//! Budget 2025 regime data.
//!
//! | Regime   | Slabs (upper bound @ rate)                              | Rebate limit | Max rebate |
//! |----------|---------------------------------------------------------|--------------|------------|
//! | Current  | 3L@0, 6L@5%, 9L@10%, 12L@15%, 15L@20%, ∞@30%            | 7,00,000     | 25,000     |
//! | Proposed | 4L@0, 8L@5%, 12L@10%, 16L@15%, 20L@20%, 24L@25%, ∞@30%  | 12,00,000    | 60,000     |
//!
//! Both regimes share the surcharge tiers (50L@0, 1Cr@10%, 2Cr@15%, 5Cr@25%,
//! ∞@37%), a 4% cess and a 50,000 standard deduction.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{Levies, Regime, RegimeConfig, RegimeSet, SlabTable, SurchargeTable, TaxSlab};

pub const CESS_RATE: Decimal = dec!(0.04);

pub const STANDARD_DEDUCTION: Decimal = dec!(50000);

pub const CURRENT_SLABS: [TaxSlab; 6] = [
    TaxSlab::bounded(dec!(300000), dec!(0)),
    TaxSlab::bounded(dec!(600000), dec!(0.05)),
    TaxSlab::bounded(dec!(900000), dec!(0.10)),
    TaxSlab::bounded(dec!(1200000), dec!(0.15)),
    TaxSlab::bounded(dec!(1500000), dec!(0.20)),
    TaxSlab::open_ended(dec!(0.30)),
];

pub const PROPOSED_SLABS: [TaxSlab; 7] = [
    TaxSlab::bounded(dec!(400000), dec!(0)),
    TaxSlab::bounded(dec!(800000), dec!(0.05)),
    TaxSlab::bounded(dec!(1200000), dec!(0.10)),
    TaxSlab::bounded(dec!(1600000), dec!(0.15)),
    TaxSlab::bounded(dec!(2000000), dec!(0.20)),
    TaxSlab::bounded(dec!(2400000), dec!(0.25)),
    TaxSlab::open_ended(dec!(0.30)),
];

pub const SURCHARGE_SLABS: [TaxSlab; 5] = [
    TaxSlab::bounded(dec!(5000000), dec!(0)),
    TaxSlab::bounded(dec!(10000000), dec!(0.10)),
    TaxSlab::bounded(dec!(20000000), dec!(0.15)),
    TaxSlab::bounded(dec!(50000000), dec!(0.25)),
    TaxSlab::open_ended(dec!(0.37)),
];

pub const CURRENT_CONFIG: RegimeConfig = RegimeConfig {
    standard_deduction: STANDARD_DEDUCTION,
    rebate_eligibility_limit: dec!(700000),
    max_rebate: dec!(25000),
};

pub const PROPOSED_CONFIG: RegimeConfig = RegimeConfig {
    standard_deduction: STANDARD_DEDUCTION,
    rebate_eligibility_limit: dec!(1200000),
    max_rebate: dec!(60000),
};

/// The two built-in regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresetRegime {
    Current,
    Proposed,
}

impl PresetRegime {
    pub const ALL: [PresetRegime; 2] = [Self::Current, Self::Proposed];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Proposed => "proposed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current Regime",
            Self::Proposed => "Proposed Regime (Budget 2025)",
        }
    }

    pub fn slabs(&self) -> &'static [TaxSlab] {
        match self {
            Self::Current => &CURRENT_SLABS,
            Self::Proposed => &PROPOSED_SLABS,
        }
    }

    pub fn config(&self) -> RegimeConfig {
        match self {
            Self::Current => CURRENT_CONFIG,
            Self::Proposed => PROPOSED_CONFIG,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == s)
    }

    /// The preset as a [`Regime`] value.
    pub fn regime(&self) -> Regime {
        Regime {
            name: self.name().to_string(),
            label: self.label().to_string(),
            slabs: preset_table(self.slabs()),
            config: self.config(),
        }
    }
}

pub fn surcharge_table() -> SurchargeTable {
    preset_table(&SURCHARGE_SLABS)
}

pub fn levies() -> Levies {
    Levies {
        surcharge: surcharge_table(),
        cess_rate: CESS_RATE,
    }
}

/// Both presets sharing the preset levies.
pub fn budget_2025() -> RegimeSet {
    let regimes = PresetRegime::ALL.iter().map(PresetRegime::regime).collect();
    match RegimeSet::new(levies(), regimes) {
        Ok(set) => set,
        Err(e) => unreachable!("preset regime names are distinct: {e}"),
    }
}

fn preset_table(slabs: &[TaxSlab]) -> SlabTable {
    match SlabTable::new(slabs.to_vec()) {
        Ok(table) => table,
        Err(e) => unreachable!("preset slab tables are valid: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_preset_table_is_valid() {
        for slabs in [&CURRENT_SLABS[..], &PROPOSED_SLABS[..], &SURCHARGE_SLABS[..]] {
            assert!(SlabTable::new(slabs.to_vec()).is_ok());
        }
    }

    #[test]
    fn parse_round_trips_names() {
        for preset in PresetRegime::ALL {
            assert_eq!(PresetRegime::parse(preset.name()), Some(preset));
        }
        assert_eq!(PresetRegime::parse("old"), None);
    }

    #[test]
    fn budget_2025_holds_both_regimes_in_order() {
        let set = budget_2025();
        let names: Vec<_> = set.regimes().iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["current", "proposed"]);
        assert_eq!(set.levies().cess_rate, dec!(0.04));
        assert_eq!(set.levies().surcharge.len(), 5);
    }

    #[test]
    fn regimes_carry_their_own_rebate_rules() {
        assert_eq!(
            PresetRegime::Current.config().rebate_eligibility_limit,
            dec!(700000)
        );
        assert_eq!(PresetRegime::Proposed.config().max_rebate, dec!(60000));
    }
}
