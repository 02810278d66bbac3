//! Reconciliation engine for two ledgers
//!
//! A run normalizes both tables, then performs two independent comparisons:
//! an exact one-to-one match on (date, debit, credit) that yields the rows
//! found on only one side, and a cross-match on (debit, credit) that yields
//! amounts booked on different dates.

pub mod exact;
pub mod grouping;

pub use exact::{match_exact, ExactMatchOutput};
pub use grouping::{group_by_amount, records_to_table};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ReconcileConfig;
use crate::normalize::Normalizer;
use crate::traits::*;
use crate::types::*;

/// A result table together with the name the writer should file it under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
}

/// Row counts of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub left_rows: usize,
    pub right_rows: usize,
    pub matched: usize,
    pub only_in_left: usize,
    pub only_in_right: usize,
    pub same_amount_different_date: usize,
}

/// Output of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub only_in_left: NamedTable,
    pub only_in_right: NamedTable,
    pub same_amount_different_date: NamedTable,
    /// Structured form of `same_amount_different_date`
    pub records: Vec<ReconciliationRecord>,
    pub summary: ReconciliationSummary,
    pub warnings: Vec<ReconcileWarning>,
}

impl Reconciliation {
    /// The three result tables in writing order
    pub fn tables(&self) -> [&NamedTable; 3] {
        [
            &self.only_in_left,
            &self.only_in_right,
            &self.same_amount_different_date,
        ]
    }

    pub fn only_in(&self, side: Side) -> &NamedTable {
        match side {
            Side::Left => &self.only_in_left,
            Side::Right => &self.only_in_right,
        }
    }

    /// True when nothing was left unmatched and no dates disagree
    pub fn is_clean(&self) -> bool {
        self.tables().iter().all(|t| t.table.is_empty())
    }

    /// Hand every result table to a sink, then finish it
    pub fn write_to<W: ReportSink + ?Sized>(&self, sink: &mut W) -> ReconcileResult<()> {
        for named in self.tables() {
            sink.write_table(&named.name, &named.table)?;
        }
        sink.finish()
    }
}

/// Runs reconciliations with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    /// Create a reconciler, rejecting an invalid configuration
    pub fn new(config: ReconcileConfig) -> ReconcileResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile two in-memory tables.
    ///
    /// Fails without producing any output when either table is missing a
    /// canonical column or contains an unparseable date.
    pub fn reconcile(&self, left: &Table, right: &Table) -> ReconcileResult<Reconciliation> {
        let normalizer = Normalizer::new(&self.config);
        let left = normalizer.normalize(&self.config.labels.left, left)?;
        let right = normalizer.normalize(&self.config.labels.right, right)?;

        let exact = match_exact(&left, &right);
        debug!(
            matched = exact.matched,
            left_only = exact.left_only.len(),
            right_only = exact.right_only.len(),
            "exact match complete"
        );

        let records = group_by_amount(&left, &right);
        debug!(groups = records.len(), "amount grouping complete");

        let columns = &self.config.columns;
        let only_in_left = NamedTable {
            name: self.config.only_in_name(Side::Left),
            table: left.project(columns, &exact.left_only)?,
        };
        let only_in_right = NamedTable {
            name: self.config.only_in_name(Side::Right),
            table: right.project(columns, &exact.right_only)?,
        };
        let same_amount_different_date = NamedTable {
            name: self.config.same_amount_name(),
            table: records_to_table(&records, &self.config)?,
        };

        let summary = ReconciliationSummary {
            left_rows: left.len(),
            right_rows: right.len(),
            matched: exact.matched,
            only_in_left: only_in_left.table.len(),
            only_in_right: only_in_right.table.len(),
            same_amount_different_date: records.len(),
        };
        info!(
            left = %self.config.labels.left,
            right = %self.config.labels.right,
            matched = summary.matched,
            only_in_left = summary.only_in_left,
            only_in_right = summary.only_in_right,
            same_amount_different_date = summary.same_amount_different_date,
            "reconciliation finished"
        );

        let mut warnings = left.warnings;
        warnings.extend(right.warnings);

        Ok(Reconciliation {
            only_in_left,
            only_in_right,
            same_amount_different_date,
            records,
            summary,
            warnings,
        })
    }

    /// Load both tables from their sources and reconcile them
    pub fn run<L, R>(&self, left: &mut L, right: &mut R) -> ReconcileResult<Reconciliation>
    where
        L: TableSource + ?Sized,
        R: TableSource + ?Sized,
    {
        info!(left = %left.describe(), right = %right.describe(), "loading ledgers");
        let left_table = left.load()?;
        let right_table = right.load()?;
        self.reconcile(&left_table, &right_table)
    }
}

/// Reconcile two tables with the default configuration
pub fn reconcile(left: &Table, right: &Table) -> ReconcileResult<Reconciliation> {
    Reconciler::default().reconcile(left, right)
}
