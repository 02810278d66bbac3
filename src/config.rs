//! Reconciliation configuration: column roles, side labels and output naming

use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::csv_io::file_stem;
use crate::utils::validation::{validate_column_role, validate_label};

/// Header names that carry the three canonical fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    pub date: String,
    pub debit: String,
    pub credit: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            debit: "debit".to_string(),
            credit: "credit".to_string(),
        }
    }
}

impl ColumnRoles {
    /// The canonical header, in output order
    pub fn canonical(&self) -> [&str; 3] {
        [
            self.date.as_str(),
            self.debit.as_str(),
            self.credit.as_str(),
        ]
    }
}

/// Display names of the two ledgers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideLabels {
    pub left: String,
    pub right: String,
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            left: "A".to_string(),
            right: "B".to_string(),
        }
    }
}

impl SideLabels {
    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Explicit names for the three result tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    pub only_left: String,
    pub only_right: String,
    pub same_amount_different_date: String,
}

/// Complete configuration for a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub columns: ColumnRoles,
    pub labels: SideLabels,
    /// Overrides the names derived from `labels`
    pub table_names: Option<TableNames>,
    /// Delimiter between dates in a reconciliation record
    pub date_joiner: String,
    /// Additional `chrono` formats tried after the built-in day-first shapes
    pub extra_date_formats: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            columns: ColumnRoles::default(),
            labels: SideLabels::default(),
            table_names: None,
            date_joiner: ", ".to_string(),
            extra_date_formats: Vec::new(),
        }
    }
}

impl ReconcileConfig {
    /// Headers, labels and sheet names used by the Turkish accounting exports
    /// this tool was first written for
    pub fn turkish() -> Self {
        Self {
            columns: ColumnRoles {
                date: "TARİH".to_string(),
                debit: "BORÇ".to_string(),
                credit: "ALACAK".to_string(),
            },
            labels: SideLabels {
                left: "Tablo 1".to_string(),
                right: "Tablo 2".to_string(),
            },
            table_names: Some(TableNames {
                only_left: "Tablo 1'de Olup Tablo 2'de Yok".to_string(),
                only_right: "Tablo 2'de Olup Tablo 1'de Yok".to_string(),
                same_amount_different_date: "Ayni Borç ve Alacak Farkli Tarihler".to_string(),
            }),
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(input: &str) -> ReconcileResult<Self> {
        let config: ReconcileConfig =
            toml::from_str(input).map_err(|e| ReconcileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReconcileResult<()> {
        validate_column_role("date", &self.columns.date)?;
        validate_column_role("debit", &self.columns.debit)?;
        validate_column_role("credit", &self.columns.credit)?;

        let [date, debit, credit] = self.columns.canonical();
        if date == debit || date == credit || debit == credit {
            return Err(ReconcileError::Config(
                "date, debit and credit must map to different columns".to_string(),
            ));
        }

        validate_label(&self.labels.left)?;
        validate_label(&self.labels.right)?;
        if self.labels.left == self.labels.right {
            return Err(ReconcileError::Config(format!(
                "left and right labels must differ, both are '{}'",
                self.labels.left
            )));
        }

        if let Some(names) = &self.table_names {
            for name in [
                &names.only_left,
                &names.only_right,
                &names.same_amount_different_date,
            ] {
                validate_label(name)?;
            }
        }

        // Result tables are filed under their stems, so those must be distinct.
        let names = [
            self.only_in_name(Side::Left),
            self.only_in_name(Side::Right),
            self.same_amount_name(),
        ];
        for (i, name) in names.iter().enumerate() {
            if let Some(other) = names[i + 1..]
                .iter()
                .find(|other| file_stem(other) == file_stem(name))
            {
                return Err(ReconcileError::Config(format!(
                    "result tables '{name}' and '{other}' would share the file name '{}'",
                    file_stem(name)
                )));
            }
        }

        Ok(())
    }

    /// Name of the table holding rows found only on `side`
    pub fn only_in_name(&self, side: Side) -> String {
        match (&self.table_names, side) {
            (Some(names), Side::Left) => names.only_left.clone(),
            (Some(names), Side::Right) => names.only_right.clone(),
            (None, side) => format!("only in {}", self.labels.get(side)),
        }
    }

    pub fn same_amount_name(&self) -> String {
        match &self.table_names {
            Some(names) => names.same_amount_different_date.clone(),
            None => "same amount different date".to_string(),
        }
    }

    /// Header of a side's date column in the grouped table, e.g. `date (A)`
    pub fn grouped_date_column(&self, side: Side) -> String {
        format!("{} ({})", self.columns.date, self.labels.get(side))
    }
}
