//! Saham CLI binary.
//!
//! Runs the IDX fundamental analysis pipeline and inspects its outputs.

mod cmd;
mod data;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "saham")]
#[command(about = "Fundamental analysis of Indonesia Stock Exchange listings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch listings and fundamentals, derive key analysis and write the report
    Run {
        /// Retrieve the whole listing instead of the first 10 companies
        #[arg(short, long)]
        full_retrieve: bool,

        /// Output format (spreadsheet, excel, csv, database)
        #[arg(short, long, default_value = "spreadsheet")]
        output_format: String,

        /// Ticker symbols to analyse instead of the exchange listing
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// File with one ticker per line
        #[arg(long)]
        symbols_file: Option<PathBuf>,

        /// Report title (defaults to "IDX Fundamental Analysis <date>")
        #[arg(long)]
        title: Option<String>,

        /// Directory for excel and csv output
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// SQLite file for database output
        #[arg(long, default_value = "saham.db")]
        database: PathBuf,
    },

    /// List derived metrics
    Metrics {
        /// Show a single metric by name
        metric: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Show formulas and guards
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show report sheets and their headers
    Sheets,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            full_retrieve,
            output_format,
            symbols,
            symbols_file,
            title,
            out_dir,
            database,
        } => {
            let options = cmd::run::RunOptions {
                full_retrieve,
                output_format: output_format.parse()?,
                symbols,
                symbols_file,
                title,
                out_dir,
                database,
            };
            cmd::run::run_pipeline(options).await?;
        }
        Commands::Metrics {
            metric: Some(name), ..
        } => {
            cmd::metrics::show_metric(&name)?;
        }
        Commands::Metrics {
            metric: None,
            category,
            verbose,
        } => {
            cmd::metrics::list_metrics(category.as_deref(), verbose)?;
        }
        Commands::Sheets => {
            cmd::sheets::list_sheets();
        }
    }

    Ok(())
}
