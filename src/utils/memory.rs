//! In-memory table source and report sink for testing

use crate::reconciliation::NamedTable;
use crate::traits::*;
use crate::types::*;

/// In-memory table source for testing and embedding
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    table: Table,
}

impl MemorySource {
    /// Create a new source that hands out a copy of `table`
    pub fn new(table: Table) -> Self {
        Self {
            name: "memory".to_string(),
            table,
        }
    }

    /// Set the name reported by `describe`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl TableSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&mut self) -> ReconcileResult<Table> {
        Ok(self.table.clone())
    }
}

/// Collects written tables in order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: Vec<NamedTable>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[NamedTable] {
        &self.tables
    }

    /// Look up a written table by name
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.table)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Clear all data (useful for testing)
    pub fn clear(&mut self) {
        self.tables.clear();
        self.finished = false;
    }
}

impl ReportSink for MemorySink {
    fn write_table(&mut self, name: &str, table: &Table) -> ReconcileResult<()> {
        self.tables.push(NamedTable {
            name: name.to_string(),
            table: table.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> ReconcileResult<()> {
        self.finished = true;
        Ok(())
    }
}
