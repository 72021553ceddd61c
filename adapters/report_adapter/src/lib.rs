use sales_core::domain::{SaleLineItem, SalesReport};
use sales_core::error::ReportError;
use sales_core::ports::ReportWriter;
use sales_core::utils::{fit_column, format_amount, format_elapsed, format_run_timestamp};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Default file the report is appended to
pub const DEFAULT_RESULTS_FILE: &str = "SalesResults.txt";

const RULE_WIDTH: usize = 90;
const SALE_ID_WIDTH: usize = 10;
const DATE_WIDTH: usize = 12;
const PRODUCT_WIDTH: usize = 30;
const QUANTITY_WIDTH: usize = 6;
const PRICE_WIDTH: usize = 12;
const COST_WIDTH: usize = 14;

/// Text report writer adapter implementation
/// Echoes the report to stdout and appends it to the results file
pub struct TextReportWriter {
    results_path: PathBuf,
    echo: bool,
}

impl TextReportWriter {
    pub fn new(results_path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: results_path.into(),
            echo: true,
        }
    }

    /// Keeps the report out of stdout; it is still appended to the file
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    fn append(&self, text: &str) -> Result<(), ReportError> {
        let persist_error = |error: io::Error| ReportError::Persist {
            target: self.results_path.display().to_string(),
            error,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.results_path)
            .map_err(persist_error)?;
        file.write_all(text.as_bytes()).map_err(persist_error)?;
        file.write_all(b"\n").map_err(persist_error)?;
        Ok(())
    }
}

impl ReportWriter for TextReportWriter {
    fn write(&self, report: &SalesReport) -> Result<(), ReportError> {
        let text = render_report(report);

        if self.echo {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(ReportError::Echo)?;
        }

        self.append(&text)?;
        info!(path = %self.results_path.display(), "Report appended to results file");
        Ok(())
    }
}

/// Renders the full report: header, metadata, line item table, footer
pub fn render_report(report: &SalesReport) -> String {
    let mut output = String::new();
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);

    output.push_str(&format!("{}\n", heavy_rule));
    output.push_str(&format!("{:^width$}\n", "SALES COMPUTATION RESULTS", width = RULE_WIDTH));
    output.push_str(&format!("{}\n", heavy_rule));

    output.push_str(&format!("Execution Time : {}\n", format_run_timestamp(&report.generated_at)));
    output.push_str(&format!("Source Program : {}\n", report.sources.program));
    output.push_str(&format!("Catalogue File : {}\n", report.sources.catalogue));
    output.push_str(&format!("Sales File     : {}\n", report.sources.sales));
    output.push_str(&format!("Products Loaded: {}\n", report.catalogue_size));
    output.push_str(&format!("{}\n", light_rule));

    if report.result.is_empty() {
        output.push_str("No valid sales records found.\n");
    } else {
        output.push_str(&format!(
            "{} {} {} {:>qw$} {:>pw$} {:>cw$}\n",
            fit_column("SALE_ID", SALE_ID_WIDTH),
            fit_column("DATE", DATE_WIDTH),
            fit_column("PRODUCT", PRODUCT_WIDTH),
            "QTY",
            "UNIT PRICE",
            "COST",
            qw = QUANTITY_WIDTH,
            pw = PRICE_WIDTH,
            cw = COST_WIDTH,
        ));
        output.push_str(&format!("{}\n", light_rule));
        for item in &report.result.line_items {
            output.push_str(&format_line_item(item));
        }
    }

    output.push_str(&format!("{}\n", light_rule));
    output.push_str(&format!("Valid Sales    : {}\n", report.result.line_items.len()));
    output.push_str(&format!("TOTAL COST     : ${}\n", format_amount(report.result.total_cost)));
    output.push_str(&format!("Elapsed Time   : {}\n", format_elapsed(report.elapsed)));
    output.push_str(&format!("{}\n", heavy_rule));

    output
}

fn format_line_item(item: &SaleLineItem) -> String {
    format!(
        "{} {} {} {:>qw$} {:>pw$} {:>cw$}\n",
        fit_column(&item.sale_id, SALE_ID_WIDTH),
        fit_column(&item.date, DATE_WIDTH),
        fit_column(&item.product, PRODUCT_WIDTH),
        item.quantity,
        format_amount(item.unit_price),
        format_amount(item.line_cost),
        qw = QUANTITY_WIDTH,
        pw = PRICE_WIDTH,
        cw = COST_WIDTH,
    )
}
