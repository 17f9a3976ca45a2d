mod regime;
mod tax_result;
mod tax_slab;

pub use regime::{Levies, Regime, RegimeConfig, RegimeConfigError, RegimeSet, RegimeSetError};
pub use tax_result::{TaxBreakdownLine, TaxResult};
pub use tax_slab::{SlabTable, SlabTableError, SurchargeTable, TaxSlab};
