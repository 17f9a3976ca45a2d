//! Interactive comparison state.
//!
//! Holds the current income and the comparison derived from it. Every change
//! to the income recomputes the comparison before returning, so the two never
//! drift apart.

use regime_core::{RegimeComparison, RegimeSetError};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::AppConfig;
use crate::utils::parse_income;

#[derive(Debug, Clone)]
pub struct Session {
    config: AppConfig,
    income: Decimal,
    comparison: RegimeComparison,
}

impl Session {
    /// Starts a session at `income`.
    ///
    /// Fails only if the configured baseline or candidate regime is missing.
    pub fn new(
        config: AppConfig,
        income: Decimal,
    ) -> Result<Self, RegimeSetError> {
        let comparison = config
            .regimes
            .compare(income, &config.baseline, &config.candidate)?;
        Ok(Self {
            config,
            income,
            comparison,
        })
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn comparison(&self) -> &RegimeComparison {
        &self.comparison
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replaces the income with free text from the user and recomputes.
    pub fn set_income(
        &mut self,
        input: &str,
    ) -> Result<&RegimeComparison, RegimeSetError> {
        let income = parse_income(input);
        debug!(%input, %income, "income changed");

        self.comparison =
            self.config
                .regimes
                .compare(income, &self.config.baseline, &self.config.candidate)?;
        self.income = income;
        Ok(&self.comparison)
    }
}
