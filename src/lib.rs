//! # Ledger Recon
//!
//! Reconciles two accounting ledgers that share a date, a debit and a credit
//! column, and reports where they disagree.
//!
//! ## Features
//!
//! - **Normalization**: trims headers, parses dates day-first into `DD/MM/YYYY`
//!   and formats debit/credit amounts with two fraction digits
//! - **Exact matching**: one-to-one outer comparison on (date, debit, credit)
//!   producing "only in A" and "only in B" tables
//! - **Amount grouping**: rows sharing (debit, credit) but booked on different
//!   dates, one record per amount pair
//! - **Collaborator seams**: `TableSource` / `ReportSink` traits with CSV and
//!   in-memory implementations
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_recon::{reconcile, Table};
//!
//! let mut left = Table::new(["date", "debit", "credit"]);
//! left.push_row(["01/01/2024", "100", "0"]).unwrap();
//!
//! let mut right = Table::new(["date", "debit", "credit"]);
//! right.push_row(["02/01/2024", "100.00", "0.00"]).unwrap();
//!
//! let result = reconcile(&left, &right).unwrap();
//! assert_eq!(result.only_in_left.table.len(), 1);
//! assert_eq!(result.same_amount_different_date.table.len(), 1);
//! ```

pub mod config;
pub mod normalize;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use normalize::{Normalizer, NormalizedTable};
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
