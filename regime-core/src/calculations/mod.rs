//! Tax computation for slab-based regimes.
//!
//! [`engine`] holds the per-regime computation, [`comparison`] pairs two
//! regimes for the same income, and [`common`] has the input and rounding
//! helpers both rely on.

pub mod common;
pub mod comparison;
pub mod engine;

pub use comparison::{
    Delta, Direction, RegimeComparison, SummaryField, Verdict, compare_regimes,
};
pub use engine::{TaxEngine, compute_tax};
