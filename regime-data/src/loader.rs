use std::collections::BTreeMap;
use std::io::Read;

use regime_core::{SlabTable, SlabTableError, TaxSlab};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading slab table data.
#[derive(Debug, Error)]
pub enum SlabTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("CSV contains no slab rows")]
    NoRecords,

    #[error("table '{table}' is invalid: {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: SlabTableError,
    },
}

impl From<csv::Error> for SlabTableLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the slab table CSV file.
///
/// - `table`: The table name (`current`, `proposed`, `surcharge`, ...)
/// - `upper_bound`: The bracket's upper bound (empty for open-ended)
/// - `rate`: The rate as a decimal (e.g., 0.05 for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub table: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for slab tables from CSV files.
///
/// Rows for the same table must appear in ascending bound order; rows of
/// different tables may be interleaved.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by table name and validate each group as a
    /// [`SlabTable`].
    ///
    /// Tables are returned sorted by name.
    pub fn build(
        records: &[SlabRecord]
    ) -> Result<BTreeMap<String, SlabTable>, SlabTableLoaderError> {
        if records.is_empty() {
            return Err(SlabTableLoaderError::NoRecords);
        }

        let mut groups: BTreeMap<String, Vec<TaxSlab>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.table.clone())
                .or_default()
                .push(TaxSlab {
                    upper_bound: record.upper_bound,
                    rate: record.rate,
                });
        }

        groups
            .into_iter()
            .map(|(table, slabs)| {
                debug!(table = %table, slabs = slabs.len(), "validating slab table");
                match SlabTable::new(slabs) {
                    Ok(validated) => Ok((table, validated)),
                    Err(source) => Err(SlabTableLoaderError::InvalidTable { table, source }),
                }
            })
            .collect()
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<BTreeMap<String, SlabTable>, SlabTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"table,upper_bound,rate
current,300000,0
current,600000,0.05
current,900000,0.10
current,1200000,0.15
current,1500000,0.20
current,,0.30
surcharge,5000000,0
surcharge,,0.10
"#;

    #[test]
    fn test_parse_csv_single_slab() {
        let csv = "table,upper_bound,rate\ncurrent,300000,0.05";

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![SlabRecord {
                table: "current".to_string(),
                upper_bound: Some(dec!(300000)),
                rate: dec!(0.05),
            }]
        );
    }

    #[test]
    fn test_parse_csv_open_ended_slab() {
        let csv = "table,upper_bound,rate\ncurrent,,0.30";

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].rate, dec!(0.30));
    }

    #[test]
    fn test_parse_csv_tolerates_whitespace() {
        let csv = "table, upper_bound, rate\n current , 300000 , 0.05 ";

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].table, "current");
        assert_eq!(records[0].upper_bound, Some(dec!(300000)));
    }

    #[test]
    fn test_parse_csv_rejects_bad_rate() {
        let csv = "table,upper_bound,rate\ncurrent,300000,five";

        let result = SlabTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(SlabTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_build_groups_by_table() {
        let tables = SlabTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load CSV");

        let names: Vec<_> = tables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["current", "surcharge"]);
        assert_eq!(tables["current"].len(), 6);
        assert_eq!(tables["surcharge"].rate_for(dec!(5000000)), dec!(0));
    }

    #[test]
    fn test_build_rejects_empty_input() {
        let result = SlabTableLoader::load("table,upper_bound,rate\n".as_bytes());

        assert!(matches!(result, Err(SlabTableLoaderError::NoRecords)));
    }

    #[test]
    fn test_build_reports_invalid_table_by_name() {
        let csv = "table,upper_bound,rate\nbroken,600000,0\nbroken,300000,0.05";

        let result = SlabTableLoader::load(csv.as_bytes());

        match result {
            Err(SlabTableLoaderError::InvalidTable { table, source }) => {
                assert_eq!(table, "broken");
                assert!(matches!(
                    source,
                    SlabTableError::NonIncreasingBound { index: 1, .. }
                ));
            }
            other => panic!("expected InvalidTable, got {other:?}"),
        }
    }
}
