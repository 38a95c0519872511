//! CSV import mapping
//!
//! Turns an uploaded CSV plus a user-chosen column mapping into transaction
//! rows ready for bulk creation. The whole batch is rejected on the first
//! row that fails to parse a required field; callers never see a partially
//! converted import.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::AMOUNT_SCALE;

/// Expected date pattern in CSV cells
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Transaction field a CSV column can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportField {
    Date,
    Amount,
    Payee,
    Notes,
    Category,
    /// Explicitly ignored column
    Skip,
}

impl ImportField {
    /// Required fields must all be mapped before any row is converted
    pub fn is_required(self) -> bool {
        matches!(self, ImportField::Date | ImportField::Amount | ImportField::Payee)
    }
}

const REQUIRED_FIELDS: [ImportField; 3] =
    [ImportField::Date, ImportField::Amount, ImportField::Payee];

/// User-chosen assignment of column indexes to transaction fields.
/// Columns absent from the map are skipped, same as an explicit `skip`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMapping(pub HashMap<usize, ImportField>);

impl ColumnMapping {
    /// Required fields that no column is mapped to
    pub fn missing_required(&self) -> Vec<ImportField> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| !self.0.values().any(|v| v == field))
            .collect()
    }

    /// The mapping is complete once every required field has a column
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Mapping progress as a percentage of required fields covered
    pub fn progress(&self) -> f64 {
        let covered = REQUIRED_FIELDS.len() - self.missing_required().len();
        covered as f64 / REQUIRED_FIELDS.len() as f64 * 100.0
    }

    fn column_of(&self, field: ImportField) -> Option<usize> {
        self.0
            .iter()
            .find(|(_, v)| **v == field)
            .map(|(col, _)| *col)
    }
}

/// Parsed CSV: one header row plus body rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A transaction-to-be produced by the mapper. The target account is chosen
/// separately by the caller; the category travels as a name until the store
/// resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub date: NaiveDate,
    /// Signed milliunits
    pub amount: i64,
    pub payee: String,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Parse raw CSV text into headers and body rows
pub fn parse_csv(content: &str) -> CoreResult<CsvDocument> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CoreError::InvalidCsv {
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CoreError::InvalidCsv {
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(CsvDocument { headers, rows })
}

/// Parse a decimal amount string and rescale it to milliunits.
/// "25.50" becomes 25500; sub-milliunit precision is rounded.
pub fn parse_amount(value: &str) -> Result<i64, String> {
    let decimal: Decimal = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a decimal number", value.trim()))?;

    (decimal * Decimal::from(AMOUNT_SCALE))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| format!("'{}' is out of range", value.trim()))
}

/// Convert every body row under the given mapping. Rejects before reading
/// any row when the mapping is incomplete; rejects the whole batch on the
/// first row with an unparsable required field.
pub fn map_rows(doc: &CsvDocument, mapping: &ColumnMapping) -> CoreResult<Vec<ImportRow>> {
    let missing = mapping.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing
            .iter()
            .map(|f| match f {
                ImportField::Date => "date",
                ImportField::Amount => "amount",
                ImportField::Payee => "payee",
                _ => unreachable!("only required fields are reported"),
            })
            .collect();
        return Err(CoreError::MappingIncomplete {
            missing: names.join(", "),
        });
    }

    let date_col = mapping.column_of(ImportField::Date).unwrap();
    let amount_col = mapping.column_of(ImportField::Amount).unwrap();
    let payee_col = mapping.column_of(ImportField::Payee).unwrap();
    let notes_col = mapping.column_of(ImportField::Notes);
    let category_col = mapping.column_of(ImportField::Category);

    let mut converted = Vec::with_capacity(doc.rows.len());

    for (index, row) in doc.rows.iter().enumerate() {
        // 1-based data row numbers in errors, matching what users count
        let row_number = index + 1;

        let date_cell = required_cell(row, date_col, row_number, "date")?;
        let date = NaiveDate::parse_from_str(date_cell.trim(), DATE_FORMAT).map_err(|_| {
            CoreError::InvalidRow {
                row: row_number,
                field: "date",
                message: format!("'{}' does not match {}", date_cell.trim(), DATE_FORMAT),
            }
        })?;

        let amount_cell = required_cell(row, amount_col, row_number, "amount")?;
        let amount = parse_amount(amount_cell).map_err(|message| CoreError::InvalidRow {
            row: row_number,
            field: "amount",
            message,
        })?;

        let payee_cell = required_cell(row, payee_col, row_number, "payee")?;
        let payee = payee_cell.trim();
        if payee.is_empty() {
            return Err(CoreError::InvalidRow {
                row: row_number,
                field: "payee",
                message: "empty value".to_string(),
            });
        }

        converted.push(ImportRow {
            date,
            amount,
            payee: payee.to_string(),
            notes: optional_cell(row, notes_col),
            category: optional_cell(row, category_col),
        });
    }

    Ok(converted)
}

fn required_cell<'a>(
    row: &'a [String],
    column: usize,
    row_number: usize,
    field: &'static str,
) -> CoreResult<&'a str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| CoreError::InvalidRow {
            row: row_number,
            field,
            message: format!("column {} is missing", column),
        })
}

fn optional_cell(row: &[String], column: Option<usize>) -> Option<String> {
    let cell = row.get(column?)?.trim();
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(usize, ImportField)]) -> ColumnMapping {
        ColumnMapping(pairs.iter().copied().collect())
    }

    #[test]
    fn test_parse_csv_headers_and_rows() {
        let doc = parse_csv("Date,Amount,Payee\n2024-01-01,25.50,Coffee Shop\n").unwrap();
        assert_eq!(doc.headers, vec!["Date", "Amount", "Payee"]);
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0], vec!["2024-01-01", "25.50", "Coffee Shop"]);
    }

    #[test]
    fn test_straightforward_mapping() {
        let doc = parse_csv("Date,Amount,Payee\n2024-01-01,25.50,Coffee Shop\n").unwrap();
        let mapping = mapping(&[
            (0, ImportField::Date),
            (1, ImportField::Amount),
            (2, ImportField::Payee),
        ]);

        let rows = map_rows(&doc, &mapping).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 25_500);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].payee, "Coffee Shop");
        assert_eq!(rows[0].notes, None);
        assert_eq!(rows[0].category, None);
    }

    #[test]
    fn test_optional_columns_and_skip() {
        let doc = parse_csv(
            "When,Ref,How Much,Who,Note,Bucket\n\
             2024-02-03,x1,-12.00,Grocer,weekly run,Food\n\
             2024-02-04,x2,-3.50,Cafe,,\n",
        )
        .unwrap();
        let mapping = mapping(&[
            (0, ImportField::Date),
            (1, ImportField::Skip),
            (2, ImportField::Amount),
            (3, ImportField::Payee),
            (4, ImportField::Notes),
            (5, ImportField::Category),
        ]);

        let rows = map_rows(&doc, &mapping).unwrap();

        assert_eq!(rows[0].amount, -12_000);
        assert_eq!(rows[0].notes.as_deref(), Some("weekly run"));
        assert_eq!(rows[0].category.as_deref(), Some("Food"));
        // Empty optional cells collapse to None
        assert_eq!(rows[1].notes, None);
        assert_eq!(rows[1].category, None);
    }

    #[test]
    fn test_incomplete_mapping_rejected_before_rows() {
        let doc = parse_csv("Date,Amount,Payee\n1999-13-99,nonsense,\n").unwrap();
        let mapping = mapping(&[(0, ImportField::Date), (1, ImportField::Amount)]);

        // Missing payee wins over every broken cell in the body
        let err = map_rows(&doc, &mapping).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MappingIncomplete { ref missing } if missing == "payee"
        ));
    }

    #[test]
    fn test_mapping_progress() {
        let mut m = ColumnMapping::default();
        assert_eq!(m.progress(), 0.0);
        assert!(!m.is_complete());

        m.0.insert(0, ImportField::Date);
        m.0.insert(1, ImportField::Amount);
        assert!(m.progress() < 100.0);

        m.0.insert(2, ImportField::Payee);
        assert_eq!(m.progress(), 100.0);
        assert!(m.is_complete());
    }

    #[test]
    fn test_bad_row_rejects_whole_batch() {
        let doc = parse_csv(
            "Date,Amount,Payee\n\
             2024-01-01,10.00,Ok Shop\n\
             2024-01-02,not-a-number,Bad Shop\n",
        )
        .unwrap();
        let mapping = mapping(&[
            (0, ImportField::Date),
            (1, ImportField::Amount),
            (2, ImportField::Payee),
        ]);

        let err = map_rows(&doc, &mapping).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidRow { row: 2, field: "amount", .. }
        ));
    }

    #[test]
    fn test_bad_date_reports_row_and_field() {
        let doc = parse_csv("Date,Amount,Payee\n01/02/2024,5.00,Shop\n").unwrap();
        let mapping = mapping(&[
            (0, ImportField::Date),
            (1, ImportField::Amount),
            (2, ImportField::Payee),
        ]);

        let err = map_rows(&doc, &mapping).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRow { row: 1, field: "date", .. }));
    }

    #[test]
    fn test_parse_amount_scaling() {
        assert_eq!(parse_amount("25.50").unwrap(), 25_500);
        assert_eq!(parse_amount("-4.999").unwrap(), -4_999);
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount(" 100 ").unwrap(), 100_000);
        // Sub-milliunit precision is rounded
        assert_eq!(parse_amount("0.0005").unwrap(), 1);
        assert!(parse_amount("12,34").is_err());
    }
}
