use anyhow::{Context, Result};
use clap::Parser;
use json_adapter::JsonFileLoader;
use report_adapter::{TextReportWriter, DEFAULT_RESULTS_FILE};
use sales_core::application::{RunSummary, SalesComputationService};
use sales_core::domain::RunSources;
use sales_core::error::PipelineError;
use sales_core::ports::{ReportWriter, SourceLoader};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// CLI tool to compute total sales cost from a price catalogue and sales records
#[derive(Parser, Debug)]
#[command(name = "compute-sales")]
#[command(about = "Computes the total cost of sales records against a JSON price catalogue")]
struct Cli {
    /// Path to the price catalogue JSON file
    catalogue: String,

    /// Path to the sales records JSON file
    sales: String,

    /// File the report is appended to
    #[arg(short = 'o', long = "output", env = "SALES_RESULTS_FILE", default_value = DEFAULT_RESULTS_FILE)]
    output: String,

    /// Tracing filter for diagnostics written to stderr
    #[arg(long = "log-level", env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Do not echo the report to stdout
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{}'", filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
    Ok(())
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "compute-sales".to_string());
    let sources = RunSources {
        program,
        catalogue: cli.catalogue.clone(),
        sales: cli.sales.clone(),
    };

    // Instantiate concrete implementations of secondary adapters
    let loader: Box<dyn SourceLoader> = Box::new(JsonFileLoader::new());
    let report_writer = TextReportWriter::new(&cli.output);
    let report_writer: Box<dyn ReportWriter> = if cli.quiet {
        Box::new(report_writer.quiet())
    } else {
        Box::new(report_writer)
    };

    let service = SalesComputationService::new(loader, report_writer);
    service.execute(&sources).context("sales computation failed")
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    println!();
    println!("Starting sales computation...");
    println!();

    match run(&cli) {
        Ok(summary) => {
            tracing::info!(
                products = summary.catalogue_size,
                valid = summary.result.line_items.len(),
                skipped = summary.diagnostics.len(),
                "Sales computation finished"
            );
            println!("Results appended to {}", cli.output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::CatalogueUnavailable(_)) => {
                    eprintln!("Failed to load price catalogue. Exiting.")
                }
                Some(PipelineError::SalesUnavailable(_)) => {
                    eprintln!("Failed to load sales records. Exiting.")
                }
                _ => {}
            }
            std::process::exit(1);
        }
    }
}
