pub mod calculations;
pub mod models;
pub mod presets;

pub use calculations::{RegimeComparison, TaxEngine, compare_regimes, compute_tax};
pub use models::*;
