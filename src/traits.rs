//! Traits for the collaborators around the reconciliation core
//!
//! The core never reads or writes files itself. Callers hand it two tables
//! through a [`TableSource`] and receive the three result tables through a
//! [`ReportSink`].

use crate::types::*;

/// Supplies one raw ledger table
///
/// Implement this for any tabular reader (CSV, spreadsheet, database query).
pub trait TableSource {
    /// Human-readable origin of the table, used in log lines
    fn describe(&self) -> String {
        "table".to_string()
    }

    /// Read the complete table into memory
    fn load(&mut self) -> ReconcileResult<Table>;
}

/// Receives named result tables
pub trait ReportSink {
    /// Persist a single table under the given name
    fn write_table(&mut self, name: &str, table: &Table) -> ReconcileResult<()>;

    /// Called once after every table has been written
    fn finish(&mut self) -> ReconcileResult<()> {
        Ok(())
    }
}

impl<T: TableSource + ?Sized> TableSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load(&mut self) -> ReconcileResult<Table> {
        (**self).load()
    }
}

impl<T: ReportSink + ?Sized> ReportSink for Box<T> {
    fn write_table(&mut self, name: &str, table: &Table) -> ReconcileResult<()> {
        (**self).write_table(name, table)
    }

    fn finish(&mut self) -> ReconcileResult<()> {
        (**self).finish()
    }
}
