use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a [`SlabTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabTableError {
    /// A table must contain at least one slab.
    #[error("slab table is empty")]
    Empty,

    /// Slab rates are fractions and must lie within 0 and 1.
    #[error("slab {index} has rate {rate}, expected a value between 0 and 1")]
    InvalidRate { index: usize, rate: Decimal },

    /// Upper bounds must be positive and strictly increasing.
    #[error("slab {index} has upper bound {bound}, which does not exceed the previous bound {previous}")]
    NonIncreasingBound {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    /// Only the last slab may be open-ended.
    #[error("slab {index} is open-ended but is not the last slab")]
    OpenEndedNotLast { index: usize },
}

/// A single income bracket: everything above the previous slab's bound and
/// up to `upper_bound` is taxed at `rate`.
///
/// An `upper_bound` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// Upper limit of the bracket, `None` for unbounded.
    #[serde(default)]
    pub upper_bound: Option<Decimal>,

    /// Marginal rate as a fraction (e.g. `0.05` for 5%).
    pub rate: Decimal,
}

impl TaxSlab {
    /// A bracket ending at `upper_bound`.
    pub const fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    /// The open-ended top bracket.
    pub const fn open_ended(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }

    /// Returns `true` if `income` does not exceed this slab's bound.
    ///
    /// The comparison is inclusive, which is what surcharge lookups need.
    pub fn covers(
        &self,
        income: Decimal,
    ) -> bool {
        self.upper_bound.is_none_or(|bound| income <= bound)
    }
}

/// An ordered, validated sequence of [`TaxSlab`]s.
///
/// The first slab's implicit lower bound is zero. Bounds are strictly
/// increasing and only the last slab may be open-ended. Rates need not be
/// monotonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxSlab>", into = "Vec<TaxSlab>")]
pub struct SlabTable {
    slabs: Vec<TaxSlab>,
}

/// Surcharge tiers share the slab table shape but are read as a single-rate
/// lookup keyed on gross income (see [`SlabTable::rate_for`]).
pub type SurchargeTable = SlabTable;

impl SlabTable {
    /// Validates and wraps `slabs`.
    ///
    /// # Errors
    ///
    /// Returns [`SlabTableError`] if the table is empty, a rate is outside
    /// `0..=1`, bounds are not strictly increasing from zero, or an
    /// open-ended slab appears before the last position.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use regime_core::{SlabTable, SlabTableError, TaxSlab};
    ///
    /// let table = SlabTable::new(vec![
    ///     TaxSlab::bounded(dec!(300000), dec!(0)),
    ///     TaxSlab::open_ended(dec!(0.05)),
    /// ]);
    /// assert!(table.is_ok());
    ///
    /// let reversed = SlabTable::new(vec![
    ///     TaxSlab::bounded(dec!(600000), dec!(0)),
    ///     TaxSlab::bounded(dec!(300000), dec!(0.05)),
    /// ]);
    /// assert!(matches!(reversed, Err(SlabTableError::NonIncreasingBound { index: 1, .. })));
    /// ```
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, SlabTableError> {
        if slabs.is_empty() {
            return Err(SlabTableError::Empty);
        }

        let last = slabs.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, slab) in slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(SlabTableError::InvalidRate {
                    index,
                    rate: slab.rate,
                });
            }

            match slab.upper_bound {
                Some(bound) if bound <= previous => {
                    return Err(SlabTableError::NonIncreasingBound {
                        index,
                        bound,
                        previous,
                    });
                }
                Some(bound) => previous = bound,
                None if index != last => {
                    return Err(SlabTableError::OpenEndedNotLast { index });
                }
                None => {}
            }
        }

        Ok(Self { slabs })
    }

    /// The slabs in ascending bound order.
    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    /// Single-rate lookup: the rate of the first slab whose bound is at or
    /// above `income`.
    ///
    /// Returns zero when `income` lies beyond a table whose top bound is
    /// finite.
    pub fn rate_for(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.slabs
            .iter()
            .find(|slab| slab.covers(income))
            .map_or(Decimal::ZERO, |slab| slab.rate)
    }
}

impl TryFrom<Vec<TaxSlab>> for SlabTable {
    type Error = SlabTableError;

    fn try_from(slabs: Vec<TaxSlab>) -> Result<Self, Self::Error> {
        Self::new(slabs)
    }
}

impl From<SlabTable> for Vec<TaxSlab> {
    fn from(table: SlabTable) -> Self {
        table.slabs
    }
}
