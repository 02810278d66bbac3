//! CSV-backed table source and report sink

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info};

use crate::traits::*;
use crate::types::*;

/// Read a CSV stream with a header row into a table.
///
/// Short rows are padded with empty cells and trailing empty cells beyond the
/// header are dropped. Rows whose cells are all blank are skipped. A UTF-8
/// byte order mark in front of the first header is removed.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> ReconcileResult<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    let width = headers.len();

    let mut table = Table::new(headers);
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            skipped += 1;
            continue;
        }

        let mut values: Vec<String> = record.iter().map(str::to_string).collect();
        while values.len() > width && values.last().is_some_and(|v| v.trim().is_empty()) {
            values.pop();
        }
        if values.len() < width {
            values.resize(width, String::new());
        }
        table.push_row(values)?;
    }

    if skipped > 0 {
        debug!(skipped, "skipped blank CSV rows");
    }
    Ok(table)
}

/// Write a table, header first, as CSV
pub fn write_csv<W: Write>(writer: W, table: &Table, delimiter: u8) -> ReconcileResult<()> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// File-system friendly form of a table name: lowercase alphanumerics
/// separated by single underscores
pub fn file_stem(name: &str) -> String {
    let mut stem = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() {
            stem.extend(c.to_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        "table".to_string()
    } else {
        stem.to_string()
    }
}

/// Table source reading CSV from any reader
#[derive(Debug)]
pub struct CsvSource<R> {
    name: String,
    reader: R,
    delimiter: u8,
}

impl<R: Read> CsvSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl CsvSource<File> {
    /// Open a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> ReconcileResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(path.display().to_string(), file))
    }
}

impl<R: Read> TableSource for CsvSource<R> {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn load(&mut self) -> ReconcileResult<Table> {
        let table = read_csv(&mut self.reader, self.delimiter)?;
        debug!(source = %self.name, rows = table.len(), "loaded CSV table");
        Ok(table)
    }
}

/// Report sink writing each table to `<dir>/<file_stem(name)>.csv`
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
    delimiter: u8,
    written: Vec<PathBuf>,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delimiter: b',',
            written: Vec::new(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Paths written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ReportSink for CsvDirectorySink {
    fn write_table(&mut self, name: &str, table: &Table) -> ReconcileResult<()> {
        let path = self.dir.join(format!("{}.csv", file_stem(name)));
        if self.written.contains(&path) {
            return Err(ReconcileError::OutputCollision {
                name: name.to_string(),
                path: path.display().to_string(),
            });
        }

        fs::create_dir_all(&self.dir)?;
        let file = File::create(&path)?;
        write_csv(file, table, self.delimiter)?;
        debug!(path = %path.display(), rows = table.len(), "wrote result table");
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> ReconcileResult<()> {
        info!(
            dir = %self.dir.display(),
            files = self.written.len(),
            "reconciliation report written"
        );
        Ok(())
    }
}
