//! CSV loader for batch comparisons.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter. Header
//! names are case-sensitive.
//!
//! | Column   | Required | Type    | Notes                                        |
//! |----------|----------|---------|----------------------------------------------|
//! | `label`  | yes      | string  | Shown at the start of each report line       |
//! | `income` | yes      | decimal | Gross income; `15,00,000` style commas allowed |
//!
//! Quote incomes that contain commas, otherwise the commas split the cell.
//!
//! ### Example
//!
//! ```csv
//! label,income
//! junior,750000
//! senior,"15,00,000"
//! ```
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::parse_decimal;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    income: String,
}

/// One income to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeEntry {
    pub label: String,
    pub income: Decimal,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading batch incomes.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `income` cell is not a number, or is negative. `row` is 1-based
    /// (header = row 0).
    #[error("invalid income '{value}' on row {row}")]
    InvalidIncome { value: String, row: usize },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into an IncomeEntry.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeEntry, CsvLoadError> {
    let invalid = || CsvLoadError::InvalidIncome {
        value: row.income.clone(),
        row: row_number,
    };

    let income = parse_decimal(&row.income).map_err(|_| invalid())?;
    if income.is_sign_negative() && !income.is_zero() {
        return Err(invalid());
    }

    Ok(IncomeEntry {
        label: row.label,
        income,
    })
}

/// Parse CSV text and return the entries in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a
///   required column is missing.
/// * [CsvLoadError::InvalidIncome] – if any income is not a non-negative
///   number.
pub fn load_from_str(input: &str) -> Result<Vec<IncomeEntry>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<IncomeEntry>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
