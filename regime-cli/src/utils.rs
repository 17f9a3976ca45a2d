use std::sync::LazyLock;

use regex::Regex;
use regime_core::calculations::common::{MAX_INCOME, clamp_income, round_half_up, round_whole};
use rust_decimal::Decimal;
use thiserror::Error;

/// Everything the income box does not keep: currency signs, separators,
/// spaces, letters.
static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9.]").unwrap_or_else(|e| unreachable!("static pattern is valid: {e}"))
});

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"15,00,000"`).
/// Empty or whitespace-only input is treated as 0.
/// Returns an error and logs when the input is invalid (non-empty but not parseable).
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Turns free text from an income field into a non-negative income.
///
/// Anything other than digits and a decimal point is dropped, so `"₹15,00,000"`
/// reads as 1500000. Input that still does not parse (e.g. `"1.2.3"`) is
/// treated as zero rather than rejected. A well-formed number too long for a
/// [`Decimal`] is clamped to [`MAX_INCOME`].
pub fn parse_income(s: &str) -> Decimal {
    let digits = NON_NUMERIC.replace_all(s, "");
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    match digits.parse::<Decimal>() {
        Ok(income) => clamp_income(income),
        Err(e) if is_plain_number(&digits) => {
            tracing::warn!(input = %s, max = %MAX_INCOME, "income too large, clamped: {}", e);
            MAX_INCOME
        }
        Err(e) => {
            tracing::warn!(input = %s, "unparseable income treated as zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// At least one digit and no more than one decimal point.
fn is_plain_number(digits: &str) -> bool {
    digits.bytes().any(|b| b.is_ascii_digit()) && digits.matches('.').count() <= 1
}

/// Formats an amount as whole rupees with Indian digit grouping,
/// e.g. `₹14,50,000`.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_whole(amount);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}₹{}", group_indian(&digits))
}

/// Groups a plain digit string as `xx,xx,xxx`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Formats a percentage with two decimals, e.g. `9.71%`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.2}%", round_half_up(percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("15,00,000").unwrap(), dec!(1500000));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn parse_income_strips_currency_and_separators() {
        assert_eq!(parse_income("₹15,00,000"), dec!(1500000));
        assert_eq!(parse_income(" 7 50 000 "), dec!(750000));
        assert_eq!(parse_income("1500000.50"), dec!(1500000.50));
    }

    #[test]
    fn parse_income_treats_garbage_as_zero() {
        assert_eq!(parse_income(""), Decimal::ZERO);
        assert_eq!(parse_income("lots"), Decimal::ZERO);
        assert_eq!(parse_income("1.2.3"), Decimal::ZERO);
    }

    #[test]
    fn parse_income_clamps_numbers_too_long_for_decimal() {
        let digits_28 = "1".repeat(28);
        let digits_30 = "1".repeat(30);

        assert_eq!(parse_income(&digits_28), MAX_INCOME);
        assert_eq!(parse_income(&digits_30), MAX_INCOME);
        assert_eq!(parse_income(&format!("₹{digits_30}.50")), MAX_INCOME);
    }

    #[test]
    fn parse_income_is_monotonic_in_digit_count() {
        let incomes: Vec<Decimal> = (20..=40)
            .map(|n| parse_income(&"9".repeat(n)))
            .collect();

        for pair in incomes.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn parse_income_ignores_minus_sign() {
        assert_eq!(parse_income("-5000"), dec!(5000));
    }

    #[test]
    fn format_inr_uses_indian_grouping() {
        assert_eq!(format_inr(dec!(0)), "₹0");
        assert_eq!(format_inr(dec!(999)), "₹999");
        assert_eq!(format_inr(dec!(1000)), "₹1,000");
        assert_eq!(format_inr(dec!(145600)), "₹1,45,600");
        assert_eq!(format_inr(dec!(1450000)), "₹14,50,000");
        assert_eq!(format_inr(dec!(123456789)), "₹12,34,56,789");
    }

    #[test]
    fn format_inr_rounds_to_whole_rupees() {
        assert_eq!(format_inr(dec!(26000.104)), "₹26,000");
        assert_eq!(format_inr(dec!(0.5)), "₹1");
    }

    #[test]
    fn format_inr_keeps_sign_for_negative_amounts() {
        assert_eq!(format_inr(dec!(-44200)), "-₹44,200");
    }

    #[test]
    fn format_percent_uses_two_decimals() {
        assert_eq!(format_percent(dec!(9.706666)), "9.71%");
        assert_eq!(format_percent(dec!(0)), "0.00%");
    }
}
