use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use compta_export::core::{ExportConfig, SheetSelector};
use compta_export::pipeline::{RunRequest, run};
use compta_export::reference::{ClientDirectory, CountryTable};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "compta-export",
    version,
    about = "Convert an invoice export into balance and tiers interchange files"
)]
struct Cli {
    /// Source export (.xlsx, .xls, .xlsm or .csv)
    input: PathBuf,

    /// Client directory (code;tax id;name;street;complement;postal code;city;country)
    #[arg(short = 'c', long = "clients")]
    clients: PathBuf,

    /// Country table (country name;ISO code); the bundled table when omitted
    #[arg(long = "countries")]
    countries: Option<PathBuf>,

    /// Output directory (default: current directory)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Worksheet of a spreadsheet source: 0-based position or name
    /// (default: first sheet, or the one set in the configuration)
    #[arg(long = "sheet")]
    sheet: Option<SheetSelector>,

    /// TOML run configuration
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Run date, YYYY-MM-DD (default: today)
    #[arg(long = "date")]
    date: Option<NaiveDate>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode, String> {
    let mut config = match &cli.config {
        Some(path) => ExportConfig::from_toml_file(path),
        None => Ok(ExportConfig::default()),
    }
    .map_err(|e| e.to_string())?;
    if let Some(sheet) = cli.sheet {
        config.source.sheet = sheet;
    }

    let clients = ClientDirectory::from_path(&cli.clients).map_err(|e| e.to_string())?;
    let countries = match &cli.countries {
        Some(path) => CountryTable::from_path(path).map_err(|e| e.to_string())?,
        None => CountryTable::bundled(),
    };

    let mut request = RunRequest::new(cli.input);
    if let Some(out) = cli.out {
        request = request.destination(out);
    }
    if let Some(date) = cli.date {
        request = request.run_date(date);
    }

    let report = run(&request, &clients, &countries, &config).map_err(|e| e.to_string())?;

    println!("{} record(s) converted", report.records);
    for outcome in &report.exports {
        println!("{}", outcome.message());
    }
    for scope in &report.skipped {
        println!("{scope}: nothing to export");
    }
    if let Some(warning) = report.unidentified_warning() {
        eprintln!("warning: {warning}");
    }

    Ok(if report.all_exported() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
