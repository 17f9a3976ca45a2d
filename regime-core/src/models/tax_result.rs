use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax charged within one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownLine {
    /// Lower edge of the bracket (the previous slab's bound, or zero).
    pub lower_bound: Decimal,

    /// Upper edge of the bracket, `None` for the open-ended top slab.
    pub upper_bound: Option<Decimal>,

    /// Marginal rate as a fraction.
    pub rate: Decimal,

    /// Portion of taxable income falling in this bracket.
    pub taxed_income: Decimal,

    /// `taxed_income * rate`.
    pub amount: Decimal,
}

impl TaxBreakdownLine {
    /// Bracket as `"lower - upper"`, with `∞` for the open-ended top.
    ///
    /// Bounds are raw numbers; currency formatting belongs to the caller.
    pub fn range_label(&self) -> String {
        let upper = self
            .upper_bound
            .map_or_else(|| "∞".to_string(), |b| b.normalize().to_string());
        format!("{} - {}", self.lower_bound.normalize(), upper)
    }

    /// Rate as a percentage string, e.g. `"5%"`.
    pub fn rate_percent(&self) -> String {
        format!("{}%", (self.rate * Decimal::ONE_HUNDRED).normalize())
    }
}

/// Complete tax computation for one income under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Gross income after clamping to zero.
    pub gross_income: Decimal,

    pub standard_deduction: Decimal,

    /// `max(0, gross_income - standard_deduction)`.
    pub taxable_income: Decimal,

    /// One line per slab with non-zero taxed income, in ascending order.
    pub slabwise_tax: Vec<TaxBreakdownLine>,

    /// Sum of the slab amounts.
    pub base_tax: Decimal,

    pub rebate: Decimal,

    pub tax_after_rebate: Decimal,

    pub surcharge: Decimal,

    pub cess: Decimal,

    /// `tax_after_rebate + surcharge + cess`.
    pub total_tax: Decimal,

    /// Total tax as a percentage of gross income, zero when income is zero.
    pub effective_rate_percent: Decimal,
}
