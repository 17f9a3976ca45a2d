//! TOML configuration for the comparison.
//!
//! Every field is optional. Anything left out falls back to the Budget 2025
//! presets, so an empty file (or no file at all) compares the built-in
//! current and proposed regimes.
//!
//! ```toml
//! cess_rate = "0.04"
//! baseline = "current"
//! candidate = "proposed"
//!
//! [[surcharge]]
//! upper_bound = "5000000"
//! rate = "0"
//!
//! [[surcharge]]
//! rate = "0.10"
//!
//! [[regimes]]
//! name = "current"
//! max_rebate = "25000"
//!
//! [[regimes]]
//! name = "flat"
//! label = "Flat 10%"
//! slabs = [{ rate = "0.10" }]
//! ```
//!
//! A `[[regimes]]` entry named after a preset adjusts that preset; any other
//! name adds a new regime, which then has to list its `slabs`. New regimes get
//! the standard 50,000 deduction and no rebate unless told otherwise.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regime_core::presets::{self, PresetRegime};
use regime_core::{
    Levies, Regime, RegimeConfig, RegimeConfigError, RegimeSet, RegimeSetError, SlabTable,
    SlabTableError, TaxSlab,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Slab table name that replaces the surcharge tiers when loading overrides.
pub const SURCHARGE_TABLE: &str = "surcharge";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid slab table '{table}': {source}")]
    InvalidSlabs {
        table: String,
        #[source]
        source: SlabTableError,
    },

    #[error("regime '{regime}' is invalid: {source}")]
    InvalidRegimeConfig {
        regime: String,
        #[source]
        source: RegimeConfigError,
    },

    #[error("regime '{0}' is not a preset and has no slabs")]
    MissingSlabs(String),

    #[error("cess rate {0} is outside 0..=1")]
    InvalidCessRate(Decimal),

    #[error(transparent)]
    Regime(#[from] RegimeSetError),
}

// ---------------------------------------------------------------------------
// On-disk layout
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    cess_rate: Option<Decimal>,
    baseline: Option<String>,
    candidate: Option<String>,
    surcharge: Option<Vec<TaxSlab>>,
    #[serde(default)]
    regimes: Vec<RegimeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegimeEntry {
    name: String,
    label: Option<String>,
    standard_deduction: Option<Decimal>,
    rebate_eligibility_limit: Option<Decimal>,
    max_rebate: Option<Decimal>,
    slabs: Option<Vec<TaxSlab>>,
}

impl RegimeEntry {
    fn into_regime(self) -> Result<Regime, ConfigError> {
        let preset = PresetRegime::parse(&self.name);

        let base_config = preset.map_or(
            RegimeConfig {
                standard_deduction: presets::STANDARD_DEDUCTION,
                rebate_eligibility_limit: Decimal::ZERO,
                max_rebate: Decimal::ZERO,
            },
            |p| p.config(),
        );
        let config = RegimeConfig::new(
            self.standard_deduction
                .unwrap_or(base_config.standard_deduction),
            self.rebate_eligibility_limit
                .unwrap_or(base_config.rebate_eligibility_limit),
            self.max_rebate.unwrap_or(base_config.max_rebate),
        )
        .map_err(|source| ConfigError::InvalidRegimeConfig {
            regime: self.name.clone(),
            source,
        })?;

        let slabs = match (self.slabs, preset) {
            (Some(slabs), _) => build_table(&self.name, slabs)?,
            (None, Some(p)) => p.regime().slabs,
            (None, None) => return Err(ConfigError::MissingSlabs(self.name)),
        };

        let label = self
            .label
            .or_else(|| preset.map(|p| p.label().to_string()))
            .unwrap_or_else(|| self.name.clone());

        Ok(Regime {
            name: self.name,
            label,
            slabs,
            config,
        })
    }
}

fn build_table(
    table: &str,
    slabs: Vec<TaxSlab>,
) -> Result<SlabTable, ConfigError> {
    SlabTable::new(slabs).map_err(|source| ConfigError::InvalidSlabs {
        table: table.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// The regimes to compare, resolved from file, presets and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub regimes: RegimeSet,
    pub baseline: String,
    pub candidate: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            regimes: presets::budget_2025(),
            baseline: PresetRegime::Current.name().to_string(),
            candidate: PresetRegime::Proposed.name().to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the config at `path`, or returns the presets when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no config file given, using Budget 2025 presets");
            return Ok(Self::default());
        };

        info!("Loading config from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        Self::from_file_config(file)
    }

    fn from_file_config(file: FileConfig) -> Result<Self, ConfigError> {
        let cess_rate = file.cess_rate.unwrap_or(presets::CESS_RATE);
        if !(Decimal::ZERO..=Decimal::ONE).contains(&cess_rate) {
            return Err(ConfigError::InvalidCessRate(cess_rate));
        }

        let surcharge = match file.surcharge {
            Some(slabs) => build_table(SURCHARGE_TABLE, slabs)?,
            None => presets::surcharge_table(),
        };

        let mut regimes: Vec<Regime> = PresetRegime::ALL.iter().map(PresetRegime::regime).collect();
        let mut added: Vec<String> = Vec::new();
        for entry in file.regimes {
            if added.contains(&entry.name) {
                return Err(RegimeSetError::DuplicateRegime(entry.name).into());
            }
            added.push(entry.name.clone());

            let regime = entry.into_regime()?;
            match regimes.iter_mut().find(|r| r.name == regime.name) {
                Some(existing) => *existing = regime,
                None => regimes.push(regime),
            }
        }

        let defaults = Self::default();
        let config = Self {
            regimes: RegimeSet::new(
                Levies {
                    surcharge,
                    cess_rate,
                },
                regimes,
            )?,
            baseline: file.baseline.unwrap_or(defaults.baseline),
            candidate: file.candidate.unwrap_or(defaults.candidate),
        };
        config.validate_selection()?;
        Ok(config)
    }

    /// Swaps in slab tables loaded from CSV, matched by regime name.
    ///
    /// A table named `surcharge` replaces the surcharge tiers.
    pub fn apply_slab_overrides(
        &mut self,
        tables: BTreeMap<String, SlabTable>,
    ) -> Result<(), ConfigError> {
        for (name, table) in tables {
            if name == SURCHARGE_TABLE {
                self.regimes.replace_surcharge(table);
            } else {
                self.regimes.replace_slabs(&name, table)?;
            }
            debug!(table = %name, "slab table overridden");
        }
        Ok(())
    }

    /// Overrides which regimes are compared.
    pub fn select(
        &mut self,
        baseline: Option<String>,
        candidate: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(baseline) = baseline {
            self.baseline = baseline;
        }
        if let Some(candidate) = candidate {
            self.candidate = candidate;
        }
        self.validate_selection()
    }

    fn validate_selection(&self) -> Result<(), ConfigError> {
        self.regimes.get(&self.baseline)?;
        self.regimes.get(&self.candidate)?;
        Ok(())
    }
}
