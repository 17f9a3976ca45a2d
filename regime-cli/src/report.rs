//! Plain-text rendering of comparisons for the terminal.

use std::fmt::{self, Display, Write};

use regime_core::calculations::comparison::{Direction, SummaryField, Verdict};
use regime_core::models::TaxBreakdownLine;
use regime_core::{Levies, Regime, RegimeComparison, TaxResult};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::{format_inr, format_percent};

const LABEL_WIDTH: usize = 28;
const VALUE_WIDTH: usize = 16;
const BRACKET_WIDTH: usize = 28;

/// One labelled income from a batch run and its comparison.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub label: String,
    pub comparison: RegimeComparison,
}

/// The full report for one income: both breakdowns, the summary table, the
/// verdict and the levies note.
pub struct ComparisonReport<'a> {
    pub comparison: &'a RegimeComparison,
    pub current: &'a Regime,
    pub proposed: &'a Regime,
    pub levies: &'a Levies,
}

impl Display for ComparisonReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("Tax Comparison\n\n")?;
        write_breakdown(f, &self.current.label, &self.comparison.current)?;
        f.write_char('\n')?;
        write_breakdown(f, &self.proposed.label, &self.comparison.proposed)?;
        f.write_char('\n')?;
        write_summary(f, self.comparison, &self.current.name, &self.proposed.name)?;
        f.write_char('\n')?;
        writeln!(f, "{}", verdict_line(self.comparison, &self.proposed.name))?;
        writeln!(f, "{}", levies_note(self.levies))
    }
}

/// One line per income with both totals and the savings.
pub struct BatchReport<'a> {
    pub rows: &'a [BatchRow],
    pub baseline: &'a str,
    pub candidate: &'a str,
}

impl Display for BatchReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$}",
            "Label", "Income", self.baseline, self.candidate, "Savings"
        )?;
        for row in self.rows {
            let c = &row.comparison;
            writeln!(
                f,
                "{:<20} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$} {:>VALUE_WIDTH$}",
                row.label,
                format_inr(c.current.gross_income),
                format_inr(c.current.total_tax),
                format_inr(c.proposed.total_tax),
                format_inr(c.savings()),
            )?;
        }
        Ok(())
    }
}

pub fn render_comparison(
    comparison: &RegimeComparison,
    current: &Regime,
    proposed: &Regime,
    levies: &Levies,
) -> String {
    ComparisonReport {
        comparison,
        current,
        proposed,
        levies,
    }
    .to_string()
}

pub fn render_batch(
    rows: &[BatchRow],
    baseline: &str,
    candidate: &str,
) -> String {
    BatchReport {
        rows,
        baseline,
        candidate,
    }
    .to_string()
}

/// `"You save ₹44,200 in the proposed regime"` or
/// `"You pay ₹0 more in the proposed regime"`.
pub fn verdict_line(
    comparison: &RegimeComparison,
    candidate: &str,
) -> String {
    match comparison.verdict() {
        Verdict::Saves(amount) => {
            format!("You save {} in the {candidate} regime", format_inr(amount))
        }
        Verdict::CostsMore(amount) => {
            format!("You pay {} more in the {candidate} regime", format_inr(amount))
        }
    }
}

pub fn levies_note(levies: &Levies) -> String {
    let top_surcharge = levies
        .surcharge
        .slabs()
        .iter()
        .map(|s| s.rate)
        .max()
        .unwrap_or_default();
    format!(
        "Note: both regimes share the same surcharge tiers (up to {}) and {} cess.",
        whole_percent(top_surcharge),
        whole_percent(levies.cess_rate),
    )
}

/// `"₹3,00,000 - ₹6,00,000"`, or `"₹15,00,000 - ∞"` for the open top.
pub fn bracket_label(line: &TaxBreakdownLine) -> String {
    let upper = line.upper_bound.map_or_else(|| "∞".to_string(), format_inr);
    format!("{} - {upper}", format_inr(line.lower_bound))
}

fn write_breakdown(
    out: &mut impl Write,
    heading: &str,
    result: &TaxResult,
) -> fmt::Result {
    writeln!(out, "{heading}")?;
    writeln!(out, "{}", "-".repeat(heading.chars().count()))?;
    if result.slabwise_tax.is_empty() {
        return out.write_str("  (no taxable income)\n");
    }
    for line in &result.slabwise_tax {
        writeln!(
            out,
            "  {:<BRACKET_WIDTH$} {:>6} {:>VALUE_WIDTH$}",
            bracket_label(line),
            line.rate_percent(),
            format_inr(line.amount),
        )?;
    }
    Ok(())
}

fn write_summary(
    out: &mut impl Write,
    comparison: &RegimeComparison,
    baseline: &str,
    candidate: &str,
) -> fmt::Result {
    let (current, proposed) = (&comparison.current, &comparison.proposed);

    writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
        "", baseline, candidate
    )?;
    write_row(out, "Gross Income", current.gross_income, proposed.gross_income, None)?;
    write_row(
        out,
        "Standard Deduction (−)",
        current.standard_deduction,
        proposed.standard_deduction,
        None,
    )?;
    write_row(out, "Taxable Income", current.taxable_income, proposed.taxable_income, None)?;

    for field in SummaryField::ALL {
        let delta = comparison.delta(field);
        if field == SummaryField::TaxAfterRebate {
            write_row(out, "Rebate under 87A (−)", current.rebate, proposed.rebate, None)?;
        }
        if field == SummaryField::EffectiveRate {
            writeln!(
                out,
                "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{}",
                field.label(),
                format_percent(delta.current),
                format_percent(delta.proposed),
                arrow(delta.direction),
            )?;
        } else {
            write_row(
                out,
                field.label(),
                delta.current,
                delta.proposed,
                Some(delta.direction),
            )?;
        }
    }
    Ok(())
}

fn write_row(
    out: &mut impl Write,
    label: &str,
    current: Decimal,
    proposed: Decimal,
    direction: Option<Direction>,
) -> fmt::Result {
    writeln!(
        out,
        "{label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{}",
        format_inr(current),
        format_inr(proposed),
        direction.map_or("", arrow),
    )
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Lower => " ↓",
        Direction::Higher => " ↑",
        Direction::Unchanged => "",
    }
}

fn whole_percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
