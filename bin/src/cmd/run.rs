//! Run command implementation.

use crate::data;
use anyhow::Result;
use chrono::Local;
use saham_analysis::BatchAnalyser;
use saham_idx::IdxClient;
use saham_report::{
    OutputFormat, Report,
    sink::{CsvSink, DatabaseSink, ExcelSink, SpreadsheetConfig, SpreadsheetSink},
};
use saham_stockbit::StockbitClient;
use saham_traits::{Company, ListingSource, RecordSink, Stock};
use std::path::PathBuf;
use tracing::{info, warn};

/// Options of one pipeline run.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub(crate) full_retrieve: bool,
    pub(crate) output_format: OutputFormat,
    pub(crate) symbols: Vec<String>,
    pub(crate) symbols_file: Option<PathBuf>,
    pub(crate) title: Option<String>,
    pub(crate) out_dir: PathBuf,
    pub(crate) database: PathBuf,
}

/// Fetch, analyse and write one report.
pub(crate) async fn run_pipeline(options: RunOptions) -> Result<()> {
    info!("IDX Composite Fundamental Analysis");

    // Fail on missing configuration before any network traffic.
    let stockbit = StockbitClient::from_env()?;
    let spreadsheet = match options.output_format {
        OutputFormat::Spreadsheet => Some(SpreadsheetConfig::from_env()?),
        _ => None,
    };

    let stocks = universe(&options).await?;
    if stocks.is_empty() {
        warn!("no stocks to analyse");
        return Ok(());
    }
    info!(count = stocks.len(), "total stocks");

    let fundamentals = stockbit.fundamentals(&stocks).await;
    let prices = stockbit.prices(&stocks).await;
    let sentiments = stockbit.sentiments(&stocks).await;
    info!(
        fundamentals = fundamentals.len(),
        prices = prices.len(),
        "provider data fetched"
    );

    let mut companies = data::assemble(stocks, fundamentals, &prices, sentiments);
    BatchAnalyser::default().run(&mut companies);

    let title = options
        .title
        .clone()
        .unwrap_or_else(|| data::default_title(Local::now().date_naive()));

    write_output(&options, spreadsheet, &companies, &title).await
}

/// The stocks to analyse: explicit symbols when given, else the listing.
async fn universe(options: &RunOptions) -> Result<Vec<Stock>> {
    let symbols = data::load_symbols(&options.symbols, options.symbols_file.as_deref())?;
    if !symbols.is_empty() {
        return Ok(symbols.into_iter().map(Stock::new).collect());
    }
    Ok(IdxClient::new(options.full_retrieve).stocks().await?)
}

/// Write the analysed companies in the selected format: whole sheets for
/// tabular formats, per-company records otherwise.
async fn write_output(
    options: &RunOptions,
    spreadsheet: Option<SpreadsheetConfig>,
    companies: &[Company],
    title: &str,
) -> Result<()> {
    if !options.output_format.is_tabular() {
        let mut sink = DatabaseSink::open(&options.database)?;
        let persisted = sink.persist_all(companies)?;
        println!("Persisted {persisted} companies to {}", options.database.display());
        return Ok(());
    }

    let report = Report::build(companies);
    match (options.output_format, spreadsheet) {
        (OutputFormat::Spreadsheet, Some(config)) => {
            let mut sink = SpreadsheetSink::create(&config, title).await?;
            report.write_to(&mut sink).await?;
            println!("Spreadsheet: https://docs.google.com/spreadsheets/d/{}", sink.spreadsheet_id());
        }
        (OutputFormat::Excel, _) => {
            std::fs::create_dir_all(&options.out_dir)?;
            let mut sink = ExcelSink::new(&options.out_dir, title);
            report.write_to(&mut sink).await?;
            println!("Workbook: {}", sink.path().display());
        }
        (OutputFormat::Csv, _) => {
            std::fs::create_dir_all(&options.out_dir)?;
            let mut sink = CsvSink::new(&options.out_dir);
            report.write_to(&mut sink).await?;
            println!("CSV files: {}", sink.written().len());
            for path in sink.written() {
                println!("  {}", path.display());
            }
        }
        (format, _) => anyhow::bail!("{format} output requires a spreadsheet configuration"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(format: OutputFormat, dir: &std::path::Path) -> RunOptions {
        RunOptions {
            full_retrieve: false,
            output_format: format,
            symbols: Vec::new(),
            symbols_file: None,
            title: None,
            out_dir: dir.join("out"),
            database: dir.join("saham.db"),
        }
    }

    fn companies() -> Vec<Company> {
        vec![Company::new(Stock::new("BBCA")), Company::new(Stock::new("TLKM"))]
    }

    #[tokio::test]
    async fn test_tabular_format_writes_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(OutputFormat::Csv, dir.path());
        write_output(&options, None, &companies(), "t").await.unwrap();
        assert!(std::fs::read_dir(&options.out_dir).unwrap().count() > 0);
        assert!(!options.database.exists());
    }

    #[tokio::test]
    async fn test_record_format_persists_companies() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(OutputFormat::Database, dir.path());
        write_output(&options, None, &companies(), "t").await.unwrap();
        assert!(options.database.exists());
        assert!(!options.out_dir.exists());
    }

    #[tokio::test]
    async fn test_spreadsheet_without_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(OutputFormat::Spreadsheet, dir.path());
        let err = write_output(&options, None, &companies(), "t").await.unwrap_err();
        assert!(err.to_string().contains("spreadsheet configuration"));
    }
}
