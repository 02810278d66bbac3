//! Normalization of raw ledger tables into comparable rows

pub mod amount;
pub mod date;

pub use amount::{parse_amount, try_parse_amount};
pub use date::parse_day_first;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ColumnRoles, ReconcileConfig};
use crate::types::*;
use crate::utils::validation::{find_duplicate_columns, require_column};

/// A ledger table after header trimming and canonical field coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    /// Display name of the ledger, used in errors and output naming
    pub label: String,
    /// Side-channel headers, in source order
    pub extra_columns: Vec<String>,
    pub rows: Vec<LedgerRow>,
    pub warnings: Vec<ReconcileWarning>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build an output table from the selected rows: canonical fields first,
    /// then this ledger's side-channel columns
    pub fn project(&self, columns: &ColumnRoles, indices: &[usize]) -> ReconcileResult<Table> {
        let header = columns
            .canonical()
            .into_iter()
            .map(str::to_string)
            .chain(self.extra_columns.iter().cloned());

        let mut table = Table::new(header);
        for &index in indices {
            let row = &self.rows[index];
            let values = [row.date_text(), row.debit.to_string(), row.credit.to_string()]
                .into_iter()
                .chain(row.extras.iter().cloned());
            table.push_row(values)?;
        }
        Ok(table)
    }

    /// Render every row back into a table with canonical values
    pub fn to_table(&self, columns: &ColumnRoles) -> ReconcileResult<Table> {
        let all: Vec<usize> = (0..self.rows.len()).collect();
        self.project(columns, &all)
    }
}

/// Counts describing one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows: usize,
    pub coerced_amounts: usize,
}

/// Turns raw tables into [`NormalizedTable`]s according to a configuration
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    config: &'a ReconcileConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a ReconcileConfig) -> Self {
        Self { config }
    }

    /// Normalize one ledger.
    ///
    /// Headers are trimmed, the date/debit/credit columns must exist, every
    /// date must parse day-first, and unusable amounts become zero.
    pub fn normalize(&self, label: &str, table: &Table) -> ReconcileResult<NormalizedTable> {
        let trimmed = table.with_trimmed_columns();
        let columns = trimmed.columns();
        let roles = &self.config.columns;

        let date_index = require_column(label, columns, &roles.date)?;
        let debit_index = require_column(label, columns, &roles.debit)?;
        let credit_index = require_column(label, columns, &roles.credit)?;
        let canonical = [date_index, debit_index, credit_index];

        let mut warnings = Vec::new();
        for column in find_duplicate_columns(columns) {
            warn!(table = label, column = %column, "duplicate column after trimming");
            warnings.push(ReconcileWarning::DuplicateColumn {
                table: label.to_string(),
                column,
            });
        }

        // Only the first occurrence of a canonical name is canonical; later
        // duplicates travel with the side-channel columns.
        let extra_indices: Vec<usize> = (0..columns.len())
            .filter(|i| !canonical.contains(i))
            .collect();
        let extra_columns = extra_indices
            .iter()
            .map(|&i| columns[i].clone())
            .collect();

        let mut stats = NormalizeStats::default();
        let mut rows = Vec::with_capacity(trimmed.len());
        for (position, raw) in trimmed.rows().iter().enumerate() {
            let date_value = &raw[date_index];
            let date = parse_day_first(date_value, &self.config.extra_date_formats).ok_or_else(
                || ReconcileError::DateParse {
                    table: label.to_string(),
                    row: position + 1,
                    value: date_value.clone(),
                },
            )?;

            let debit = self.amount(&raw[debit_index], &mut stats);
            let credit = self.amount(&raw[credit_index], &mut stats);

            rows.push(LedgerRow {
                date,
                debit,
                credit,
                extras: extra_indices.iter().map(|&i| raw[i].clone()).collect(),
            });
        }
        stats.rows = rows.len();

        if rows.is_empty() {
            warn!(table = label, "table has no rows");
            warnings.push(ReconcileWarning::EmptyInput {
                table: label.to_string(),
            });
        }

        debug!(
            table = label,
            rows = stats.rows,
            coerced_amounts = stats.coerced_amounts,
            "normalized table"
        );

        Ok(NormalizedTable {
            label: label.to_string(),
            extra_columns,
            rows,
            warnings,
        })
    }

    fn amount(&self, raw: &str, stats: &mut NormalizeStats) -> Amount {
        if !raw.trim().is_empty() && try_parse_amount(raw).is_none() {
            stats.coerced_amounts += 1;
        }
        parse_amount(raw)
    }
}
