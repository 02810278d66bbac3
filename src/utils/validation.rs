//! Validation utilities for headers and configuration values

use std::collections::HashSet;

use crate::types::*;

/// Validate that a canonical column role maps to a usable header
pub fn validate_column_role(role: &str, column: &str) -> ReconcileResult<()> {
    if column.trim().is_empty() {
        return Err(ReconcileError::Config(format!(
            "column for '{role}' cannot be empty"
        )));
    }

    if column.trim() != column {
        return Err(ReconcileError::Config(format!(
            "column for '{role}' cannot have surrounding whitespace: '{column}'"
        )));
    }

    Ok(())
}

/// Validate a side label or table name
pub fn validate_label(label: &str) -> ReconcileResult<()> {
    if label.trim().is_empty() {
        return Err(ReconcileError::Config(
            "labels and table names cannot be empty".to_string(),
        ));
    }

    if label.len() > 100 {
        return Err(ReconcileError::Config(
            "labels and table names cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Header names that occur more than once, in order of their second occurrence
pub fn find_duplicate_columns(columns: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for column in columns {
        if !seen.insert(column.as_str()) && !duplicates.contains(column) {
            duplicates.push(column.clone());
        }
    }
    duplicates
}

/// Locate a required column by exact, case-sensitive name
pub fn require_column(table: &str, columns: &[String], column: &str) -> ReconcileResult<usize> {
    columns
        .iter()
        .position(|c| c == column)
        .ok_or_else(|| ReconcileError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
}
