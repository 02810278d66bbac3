//! Core types and data structures for the reconciliation engine

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Text layout every normalized date is rendered with
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Raw tabular input or output: a header plus rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from a header and a set of rows
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<String>>) -> ReconcileResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row; its width must match the header
    pub fn push_row<I, S>(&mut self, values: I) -> ReconcileResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = values.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(ReconcileError::RaggedRow {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with exactly this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Copy of this table with surrounding whitespace removed from every header
    pub fn with_trimmed_columns(&self) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.trim().to_string()).collect(),
            rows: self.rows.clone(),
        }
    }
}

/// Which of the two input ledgers a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Largest number of integer digits an amount may carry
pub const MAX_AMOUNT_INTEGER_DIGITS: i64 = 30;

/// Largest number of significant digits accepted before rounding
pub const MAX_AMOUNT_SIGNIFICANT_DIGITS: u64 = 64;

/// Monetary amount held at exactly two fraction digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Zero amount (`0.00`)
    pub fn zero() -> Self {
        Self(BigDecimal::from(0).with_scale(2))
    }

    /// Round a decimal half-to-even to two places, keeping its sign.
    ///
    /// Returns `None` for values with more than
    /// [`MAX_AMOUNT_INTEGER_DIGITS`] integer digits or more than
    /// [`MAX_AMOUNT_SIGNIFICANT_DIGITS`] significant digits. Values below one
    /// thousandth become zero without rescaling.
    pub fn from_decimal(value: &BigDecimal) -> Option<Self> {
        if value.is_zero() {
            return Some(Self::zero());
        }

        let digits = value.digits();
        if digits > MAX_AMOUNT_SIGNIFICANT_DIGITS {
            return None;
        }

        // Rescaling cost grows with the exponent, so bound it first.
        let (_, scale) = value.as_bigint_and_exponent();
        let integer_digits = (digits as i64).saturating_sub(scale);
        if integer_digits > MAX_AMOUNT_INTEGER_DIGITS {
            return None;
        }
        if integer_digits < -2 {
            return Some(Self::zero());
        }

        Some(Self(value.with_scale_round(2, RoundingMode::HalfEven)))
    }

    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    // Rendered from the scaled integer so huge or tiny values never switch
    // to exponent notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cents, _scale) = self.0.as_bigint_and_exponent();
        let text = cents.to_string();
        let (sign, magnitude) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let digits = format!("{magnitude:0>3}");
        let (units, fraction) = digits.split_at(digits.len() - 2);
        write!(f, "{sign}{units}.{fraction}")
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Render a date in the canonical `DD/MM/YYYY` layout
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A ledger row after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub debit: Amount,
    pub credit: Amount,
    /// Side-channel values, aligned with `NormalizedTable::extra_columns`
    pub extras: Vec<String>,
}

impl LedgerRow {
    pub fn date_text(&self) -> String {
        format_date(&self.date)
    }

    pub fn exact_key(&self) -> ExactKey {
        ExactKey {
            date: self.date_text(),
            debit: self.debit.to_string(),
            credit: self.credit.to_string(),
        }
    }

    pub fn amount_key(&self) -> AmountKey {
        AmountKey {
            debit: self.debit.to_string(),
            credit: self.credit.to_string(),
        }
    }
}

/// Key for row-level equality: (date, debit, credit) as normalized text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExactKey {
    pub date: String,
    pub debit: String,
    pub credit: String,
}

/// Key for amount-only comparison: (debit, credit) as normalized text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AmountKey {
    pub debit: String,
    pub credit: String,
}

/// One amount pair whose dates disagree between the two ledgers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationRecord {
    pub debit: Amount,
    pub credit: Amount,
    /// Distinct dates from the left ledger, sorted as text
    pub left_dates: BTreeSet<String>,
    /// Distinct dates from the right ledger, sorted as text
    pub right_dates: BTreeSet<String>,
}

impl ReconciliationRecord {
    pub fn dates(&self, side: Side) -> &BTreeSet<String> {
        match side {
            Side::Left => &self.left_dates,
            Side::Right => &self.right_dates,
        }
    }

    /// Join one side's dates with the given delimiter
    pub fn joined_dates(&self, side: Side, joiner: &str) -> String {
        self.dates(side)
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(joiner)
    }
}

/// Non-fatal conditions observed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconcileWarning {
    /// The table had a header but no data rows
    EmptyInput { table: String },
    /// Two headers were identical after trimming; the first one wins
    DuplicateColumn { table: String, column: String },
}

impl fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput { table } => write!(f, "table '{table}' has no rows"),
            Self::DuplicateColumn { table, column } => {
                write!(f, "table '{table}': column '{column}' appears more than once")
            }
        }
    }
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("table '{table}': missing required column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("table '{table}', row {row}: cannot parse date '{value}'")]
    DateParse {
        table: String,
        row: usize,
        value: String,
    },
    #[error("row has {found} values but the table has {expected} columns")]
    RaggedRow { expected: usize, found: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("table '{name}' would overwrite {path}")]
    OutputCollision { name: String, path: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(raw: &str) -> Amount {
        Amount::from_decimal(&BigDecimal::from_str(raw).unwrap()).unwrap()
    }

    #[test]
    fn test_amount_display_has_two_fraction_digits() {
        assert_eq!(amount("100").to_string(), "100.00");
        assert_eq!(amount("100.5").to_string(), "100.50");
        assert_eq!(amount("0.07").to_string(), "0.07");
        assert_eq!(amount("0").to_string(), "0.00");
        assert_eq!(Amount::zero().to_string(), "0.00");
        assert_eq!(amount("1e3").to_string(), "1000.00");
    }

    #[test]
    fn test_amount_equal_across_precision() {
        assert_eq!(amount("100"), amount("100.000"));
        assert_eq!(amount("100").to_string(), amount("100.0000").to_string());
    }

    #[test]
    fn test_amount_keeps_sign() {
        assert_eq!(amount("-5").to_string(), "-5.00");
        assert_eq!(amount("-100.004").to_string(), "-100.00");
        assert_eq!(amount("-0.07").to_string(), "-0.07");
        assert_ne!(amount("-100"), Amount::zero());

        // rounds to zero, and zero carries no sign
        assert_eq!(amount("-0.001").to_string(), "0.00");
        assert_eq!(amount("-0.001"), Amount::zero());
    }

    #[test]
    fn test_amount_bounds_magnitude() {
        let huge = BigDecimal::from_str("1e1000000").unwrap();
        assert!(Amount::from_decimal(&huge).is_none());

        let negative_huge = BigDecimal::from_str("-1e1000000").unwrap();
        assert!(Amount::from_decimal(&negative_huge).is_none());

        let tiny = BigDecimal::from_str("1e-1000000").unwrap();
        assert_eq!(Amount::from_decimal(&tiny), Some(Amount::zero()));

        let zero = BigDecimal::from_str("0e1000000").unwrap();
        assert_eq!(Amount::from_decimal(&zero), Some(Amount::zero()));

        let widest = "9".repeat(30);
        assert_eq!(amount(&widest).to_string(), format!("{widest}.00"));
        let too_wide = BigDecimal::from_str(&"9".repeat(31)).unwrap();
        assert!(Amount::from_decimal(&too_wide).is_none());

        let long_fraction = BigDecimal::from_str(&format!("0.{}", "1".repeat(80))).unwrap();
        assert!(Amount::from_decimal(&long_fraction).is_none());
    }

    #[test]
    fn test_table_push_row_checks_width() {
        let mut table = Table::new(["date", "debit", "credit"]);
        assert!(table.push_row(["01/01/2024", "1", "0"]).is_ok());

        let err = table.push_row(["01/01/2024", "1"]).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RaggedRow {
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_from_rows_and_lookup() {
        let table = Table::from_rows(
            ["date", "debit", "credit"],
            vec![vec!["01/01/2024".to_string(), "5".to_string(), "0".to_string()]],
        )
        .unwrap();

        assert_eq!(table.column_index("credit"), Some(2));
        assert_eq!(table.value(0, "debit"), Some("5"));
        assert_eq!(table.value(0, "memo"), None);
        assert_eq!(table.value(1, "debit"), None);
    }

    #[test]
    fn test_trimming_columns_is_idempotent() {
        let table = Table::new(["  date ", "debit\t", "credit"]);
        let once = table.with_trimmed_columns();
        let twice = once.with_trimmed_columns();
        assert_eq!(once.columns(), &["date", "debit", "credit"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_record_joins_dates_in_text_order() {
        let record = ReconciliationRecord {
            debit: amount("10"),
            credit: Amount::zero(),
            left_dates: ["15/01/2024", "02/03/2024"]
                .into_iter()
                .map(String::from)
                .collect(),
            right_dates: BTreeSet::from(["01/01/2024".to_string()]),
        };
        assert_eq!(
            record.joined_dates(Side::Left, ", "),
            "02/03/2024, 15/01/2024"
        );
        assert_eq!(record.joined_dates(Side::Right, ", "), "01/01/2024");
    }
}
