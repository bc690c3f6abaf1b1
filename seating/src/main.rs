//! Seat allocation command-line tool.
//!
//! Reads reservation requests, one `<id> <count>` per line, seats them, writes
//! the ticket manifest and prints the seating map and a status summary.

use anyhow::Context;
use clap::Parser;
use seatplan::{process_lines, seating_store, Config, SeatingAction};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments. Flags override `SEATPLAN_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "seatplan")]
#[command(about = "Seat theater reservations with safety buffers")]
#[command(version)]
struct Cli {
    /// Request file, one `<reservation-id> <seat-count>` per line
    input: PathBuf,

    /// Number of rows
    #[arg(long)]
    rows: Option<usize>,

    /// Seats per row
    #[arg(long)]
    cols: Option<usize>,

    /// Rows kept free above and below each seated group
    #[arg(long)]
    row_buffer: Option<usize>,

    /// Seats kept free left and right of each seated group
    #[arg(long)]
    col_buffer: Option<usize>,

    /// Ticket manifest output path
    #[arg(long, value_name = "PATH")]
    tickets: Option<PathBuf>,

    /// Write allocation records as JSON lines to this path
    #[arg(long, value_name = "PATH")]
    records: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        let layout = &mut config.layout;
        layout.rows = self.rows.unwrap_or(layout.rows);
        layout.cols = self.cols.unwrap_or(layout.cols);
        layout.row_buffer = self.row_buffer.unwrap_or(layout.row_buffer);
        layout.col_buffer = self.col_buffer.unwrap_or(layout.col_buffer);
        if let Some(tickets) = &self.tickets {
            config.output.tickets_path.clone_from(tickets);
        }
        if self.records.is_some() {
            config.output.records_path.clone_from(&self.records);
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply(&mut config);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate().context("invalid configuration")?;
    info!(
        rows = config.layout.rows,
        cols = config.layout.cols,
        row_buffer = config.layout.row_buffer,
        col_buffer = config.layout.col_buffer,
        "Configuration loaded"
    );

    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read requests from {}", cli.input.display()))?;

    let records = Rc::new(RefCell::new(Vec::<SeatingAction>::new()));
    let mut store = seating_store(config.layout);
    {
        let records = Rc::clone(&records);
        store.subscribe(move |event| records.borrow_mut().push(event.clone()));
    }

    let sent = process_lines(&mut store, input.lines()).context("request processing stopped")?;
    info!(requests = sent, "All requests processed");

    let report = store.state(seatplan::SeatingState::report);

    let tickets_path = &config.output.tickets_path;
    store
        .state(|s| write_manifest(s.ledger(), tickets_path))
        .with_context(|| format!("failed to write manifest to {}", tickets_path.display()))?;

    if let Some(records_path) = &config.output.records_path {
        write_records(&records.borrow(), records_path)
            .with_context(|| format!("failed to write records to {}", records_path.display()))?;
        info!(path = %records_path.display(), "Allocation records written");
    }

    let manifest_location = fs::canonicalize(tickets_path).unwrap_or_else(|_| tickets_path.clone());

    let mut out = std::io::stdout().lock();
    write!(out, "{}", report.seating_map)?;
    writeln!(out)?;
    writeln!(out, "The file is stored at: {}", manifest_location.display())?;
    writeln!(out)?;
    if !report.rejected.is_empty() {
        writeln!(out, "Rejected requests:")?;
        writeln!(out, "{}", report.rejected_line())?;
        writeln!(out)?;
    }
    if report.has_violations() {
        writeln!(out, "Requests the grid could not fully seat:")?;
        writeln!(out, "{}", report.incomplete_line())?;
        writeln!(out)?;
    }
    writeln!(out, "{}", report.status())?;
    out.flush()?;

    if report.has_violations() {
        tracing::error!(
            incomplete = report.counters.incomplete,
            "Some admitted requests could not be fully seated"
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn write_manifest(ledger: &seatplan::ledger::TicketLedger, path: &Path) -> std::io::Result<()> {
    ledger.write_manifest(BufWriter::new(File::create(path)?))
}

fn write_records(records: &[SeatingAction], path: &Path) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use seatplan::TheaterLayout;

    fn env_config() -> Config {
        Config::from_lookup(|key| {
            let value = match key {
                "SEATPLAN_ROWS" => "7",
                "SEATPLAN_COLS" => "9",
                "SEATPLAN_COL_BUFFER" => "2",
                "SEATPLAN_TICKETS" => "env-tickets.txt",
                "SEATPLAN_RECORDS" => "env-records.jsonl",
                _ => return None,
            };
            Some(value.to_string())
        })
    }

    #[test]
    fn flags_take_precedence_over_environment() {
        let cli = Cli::try_parse_from([
            "seatplan",
            "requests.txt",
            "--rows",
            "4",
            "--row-buffer",
            "0",
            "--tickets",
            "out.txt",
        ])
        .unwrap();
        let mut config = env_config();

        cli.apply(&mut config);

        assert_eq!(cli.input, PathBuf::from("requests.txt"));
        assert_eq!(config.layout, TheaterLayout::new(4, 9, 0, 2));
        assert_eq!(config.output.tickets_path, PathBuf::from("out.txt"));
        assert_eq!(config.output.records_path, Some(PathBuf::from("env-records.jsonl")));
    }

    #[test]
    fn records_flag_enables_records_without_environment() {
        let cli = Cli::try_parse_from(["seatplan", "requests.txt", "--records", "r.jsonl"]).unwrap();
        let mut config = Config::from_lookup(|_| None);

        cli.apply(&mut config);

        assert_eq!(config.output.records_path, Some(PathBuf::from("r.jsonl")));
        assert_eq!(config.layout, TheaterLayout::default());
    }

    #[test]
    fn no_flags_leave_environment_untouched() {
        let cli = Cli::try_parse_from(["seatplan", "requests.txt"]).unwrap();
        let mut config = env_config();

        cli.apply(&mut config);

        assert_eq!(config, env_config());
    }

    #[test]
    fn oversized_flags_fail_validation() {
        let cli = Cli::try_parse_from(["seatplan", "requests.txt", "--rows", "100000", "--cols", "100000"])
            .unwrap();
        let mut config = Config::default();

        cli.apply(&mut config);

        assert!(matches!(
            config.validate(),
            Err(seatplan::ConfigError::TooLarge { .. })
        ));
    }
}
