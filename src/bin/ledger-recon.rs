// ledger-recon - reconcile two ledger CSV exports from the command line

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use ledger_recon::utils::{CsvDirectorySink, CsvSource};
use ledger_recon::{ReconcileConfig, ReconcileError, ReconcileResult, Reconciler, Reconciliation};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// One CSV file per result table in the output directory
    Csv,
    /// The whole reconciliation as JSON on stdout
    Json,
}

#[derive(Parser)]
#[command(name = "ledger-recon")]
#[command(about = "Compare two ledgers by date, debit and credit")]
#[command(version)]
struct Cli {
    /// First ledger (CSV with a header row)
    left: PathBuf,

    /// Second ledger (CSV with a header row)
    right: PathBuf,

    /// Directory for the result tables
    #[arg(long, short = 'o', default_value = ".")]
    output: PathBuf,

    /// TOML file with column names, labels and date formats
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Use the TARİH / BORÇ / ALACAK headers and Turkish table names
    #[arg(long, conflicts_with = "config")]
    turkish: bool,

    /// Field delimiter for input and output CSV
    #[arg(long, short = 'd', default_value_t = ',')]
    delimiter: char,

    /// Label for the first ledger
    #[arg(long)]
    left_label: Option<String>,

    /// Label for the second ledger
    #[arg(long)]
    right_label: Option<String>,

    #[arg(long, short = 'f', value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Log debug details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(exit_status(&run(cli)))
}

fn exit_status(result: &ReconcileResult<()>) -> u8 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{e}");
            EXIT_ERROR
        }
    }
}

fn run(cli: Cli) -> ReconcileResult<()> {
    let delimiter = delimiter_byte(cli.delimiter)?;
    let config = load_config(&cli)?;
    let reconciler = Reconciler::new(config)?;

    let mut left = CsvSource::from_path(&cli.left)?.with_delimiter(delimiter);
    let mut right = CsvSource::from_path(&cli.right)?.with_delimiter(delimiter);
    let result = reconciler.run(&mut left, &mut right)?;

    for warning in &result.warnings {
        warn!("{warning}");
    }

    match cli.format {
        Format::Csv => {
            let mut sink = CsvDirectorySink::new(&cli.output).with_delimiter(delimiter);
            result.write_to(&mut sink)?;
            for path in sink.written() {
                println!("{}", path.display());
            }
        }
        Format::Json => print_json(&result)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> ReconcileResult<ReconcileConfig> {
    let mut config = match (&cli.config, cli.turkish) {
        (Some(path), _) => ReconcileConfig::from_toml(&std::fs::read_to_string(path)?)?,
        (None, true) => ReconcileConfig::turkish(),
        (None, false) => ReconcileConfig::default(),
    };

    if let Some(label) = &cli.left_label {
        config.labels.left = label.clone();
    }
    if let Some(label) = &cli.right_label {
        config.labels.right = label.clone();
    }
    Ok(config)
}

fn delimiter_byte(delimiter: char) -> ReconcileResult<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ReconcileError::Config(format!("delimiter must be ASCII, got '{delimiter}'")))
}

fn print_json(result: &Reconciliation) -> ReconcileResult<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const LEFT: &str = "date,debit,credit,memo\n01/01/2024,100,0,rent\n05/01/2024,0,20,fee\n";
    const RIGHT: &str = "date,debit,credit\n01/01/2024,100.00,0.00\n07/01/2024,0,20\n";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ledger-recon").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_run_writes_three_tables() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(dir.path(), "bank.csv", LEFT);
        let right = write(dir.path(), "books.csv", RIGHT);
        let out = dir.path().join("out");

        let args = cli(&[
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--left-label",
            "bank",
            "--right-label",
            "books",
        ]);
        assert_eq!(exit_status(&run(args)), EXIT_SUCCESS);

        let only_bank = fs::read_to_string(out.join("only_in_bank.csv")).unwrap();
        assert_eq!(only_bank, "date,debit,credit,memo\n05/01/2024,0.00,20.00,fee\n");
        let only_books = fs::read_to_string(out.join("only_in_books.csv")).unwrap();
        assert_eq!(only_books, "date,debit,credit\n07/01/2024,0.00,20.00\n");
        let grouped = fs::read_to_string(out.join("same_amount_different_date.csv")).unwrap();
        assert_eq!(
            grouped,
            "debit,credit,date (bank),date (books)\n0.00,20.00,05/01/2024,07/01/2024\n"
        );
    }

    #[test]
    fn test_run_missing_column_exits_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(dir.path(), "a.csv", LEFT);
        let right = write(dir.path(), "b.csv", "when,debit,credit\n01/01/2024,1,0\n");
        let out = dir.path().join("out");

        let args = cli(&[
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        let result = run(args);
        assert!(matches!(
            result,
            Err(ReconcileError::MissingColumn { ref table, ref column }) if table == "B" && column == "date"
        ));
        assert_eq!(exit_status(&result), EXIT_ERROR);
        assert!(!out.exists());
    }

    #[test]
    fn test_run_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(dir.path(), "a.csv", LEFT);
        let right = write(dir.path(), "b.csv", RIGHT);
        let out = dir.path().join("out");

        let args = cli(&[
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "--format",
            "json",
            "-o",
            out.to_str().unwrap(),
        ]);
        assert!(matches!(args.format, Format::Json));
        assert_eq!(exit_status(&run(args)), EXIT_SUCCESS);
        assert!(!out.exists());
    }

    #[test]
    fn test_load_config_applies_label_overrides() {
        let config = load_config(&cli(&["a.csv", "b.csv", "--left-label", "bank"])).unwrap();
        assert_eq!(config.labels.left, "bank");
        assert_eq!(config.labels.right, "B");

        let config = load_config(&cli(&["a.csv", "b.csv", "--turkish"])).unwrap();
        assert_eq!(config, ReconcileConfig::turkish());
    }

    #[test]
    fn test_load_config_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "recon.toml",
            "[columns]\ndate = \"Posted\"\n\n[labels]\nleft = \"bank\"\n",
        );

        let args = cli(&["a.csv", "b.csv", "-c", path.to_str().unwrap(), "--right-label", "books"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.columns.date, "Posted");
        assert_eq!(config.labels.left, "bank");
        assert_eq!(config.labels.right, "books");
    }

    #[test]
    fn test_colliding_labels_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(dir.path(), "a.csv", LEFT);
        let right = write(dir.path(), "b.csv", RIGHT);

        let args = cli(&[
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "--left-label",
            "Bank",
            "--right-label",
            "bank",
        ]);
        assert!(matches!(run(args), Err(ReconcileError::Config(_))));
    }

    #[test]
    fn test_usage_errors_exit_with_two() {
        let err = Cli::try_parse_from(["ledger-recon", "a.csv", "b.csv", "--turkish", "-c", "x.toml"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["ledger-recon", "a.csv"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(matches!(delimiter_byte('é'), Err(ReconcileError::Config(_))));
    }
}
