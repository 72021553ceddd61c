use std::time::Instant;

use chrono::Local;
use tracing::{error, info};

use crate::catalogue::CatalogueBuilder;
use crate::diagnostics::Diagnostic;
use crate::domain::{AggregationResult, RunSources, SalesReport};
use crate::error::PipelineError;
use crate::ports::{ReportWriter, SourceLoader};
use crate::sales::SalesAggregator;

/// What a completed run produced, for callers that want more than the report
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub catalogue_size: usize,
    pub result: AggregationResult,
    pub diagnostics: Vec<Diagnostic>,
}

/// Application service wiring the loader, both pipeline stages and the report writer
pub struct SalesComputationService {
    loader: Box<dyn SourceLoader>,
    report_writer: Box<dyn ReportWriter>,
}

impl SalesComputationService {
    /// Creates a new SalesComputationService with the given dependencies
    pub fn new(loader: Box<dyn SourceLoader>, report_writer: Box<dyn ReportWriter>) -> Self {
        Self { loader, report_writer }
    }

    /// Loads both sources, builds the catalogue, aggregates the sales and
    /// hands the report to the writer. Only whole-source and report failures
    /// are returned as errors.
    pub fn execute(&self, sources: &RunSources) -> Result<RunSummary, PipelineError> {
        let generated_at = Local::now();
        let started = Instant::now();

        let catalogue_data = self.loader.load(&sources.catalogue).map_err(|e| {
            error!(error = %e, source_id = %sources.catalogue, "Failed to load price catalogue");
            PipelineError::CatalogueUnavailable(e)
        })?;
        let sales_data = self.loader.load(&sources.sales).map_err(|e| {
            error!(error = %e, source_id = %sources.sales, "Failed to load sales records");
            PipelineError::SalesUnavailable(e)
        })?;

        let (catalogue, mut diagnostics) = CatalogueBuilder::build(&catalogue_data).into_parts();
        info!("Loaded {} products from catalogue", catalogue.len());

        let (result, sales_diagnostics) = SalesAggregator::aggregate(&sales_data, &catalogue).into_parts();
        info!("Processed {} valid sales records", result.line_items.len());
        diagnostics.extend(sales_diagnostics);

        let report = SalesReport {
            generated_at,
            sources: sources.clone(),
            catalogue_size: catalogue.len(),
            result,
            elapsed: started.elapsed(),
        };
        self.report_writer.write(&report)?;
        info!(
            total_cost = report.result.total_cost,
            skipped = diagnostics.len(),
            "Sales report written"
        );

        Ok(RunSummary {
            catalogue_size: report.catalogue_size,
            result: report.result,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadError, ReportError};
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    struct InMemoryLoader {
        sources: HashMap<String, Value>,
    }

    impl SourceLoader for InMemoryLoader {
        fn load(&self, source_id: &str) -> Result<Value, LoadError> {
            self.sources.get(source_id).cloned().ok_or_else(|| LoadError::NotFound {
                source_id: source_id.to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingWriter {
        reports: Rc<RefCell<Vec<SalesReport>>>,
    }

    impl ReportWriter for RecordingWriter {
        fn write(&self, report: &SalesReport) -> Result<(), ReportError> {
            self.reports.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    fn sources() -> RunSources {
        RunSources {
            program: "compute-sales".to_string(),
            catalogue: "catalogue.json".to_string(),
            sales: "sales.json".to_string(),
        }
    }

    fn service(entries: Vec<(&str, Value)>, writer: RecordingWriter) -> SalesComputationService {
        let sources = entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        SalesComputationService::new(Box::new(InMemoryLoader { sources }), Box::new(writer))
    }

    #[test]
    fn test_execute_writes_report_for_scenario() {
        let writer = RecordingWriter::default();
        let svc = service(
            vec![
                ("catalogue.json", json!([{"title": "Apple", "price": "1.50"}, {"title": "Orange", "price": 2}])),
                (
                    "sales.json",
                    json!([
                        {"Product": "Apple", "Quantity": 3},
                        {"Product": "Kiwi", "Quantity": 1},
                        {"Product": "Orange", "Quantity": "2"}
                    ]),
                ),
            ],
            writer.clone(),
        );

        let summary = svc.execute(&sources()).unwrap();
        assert_eq!(summary.catalogue_size, 2);
        assert_eq!(summary.result.total_cost, 8.5);
        assert_eq!(summary.diagnostics.len(), 1);

        let reports = writer.reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].sources, sources());
        assert_eq!(reports[0].result.line_items.len(), 2);
    }

    #[test]
    fn test_execute_missing_catalogue_is_fatal_and_writes_nothing() {
        let writer = RecordingWriter::default();
        let svc = service(vec![("sales.json", json!([]))], writer.clone());

        let err = svc.execute(&sources()).unwrap_err();
        assert!(matches!(err, PipelineError::CatalogueUnavailable(LoadError::NotFound { .. })));
        assert!(writer.reports.borrow().is_empty());
    }

    #[test]
    fn test_execute_missing_sales_is_fatal() {
        let writer = RecordingWriter::default();
        let svc = service(vec![("catalogue.json", json!([]))], writer.clone());

        let err = svc.execute(&sources()).unwrap_err();
        assert!(matches!(err, PipelineError::SalesUnavailable(_)));
        assert!(writer.reports.borrow().is_empty());
    }

    #[test]
    fn test_execute_degraded_inputs_still_report() {
        let writer = RecordingWriter::default();
        let svc = service(
            vec![("catalogue.json", json!({"title": "Apple"})), ("sales.json", json!("nope"))],
            writer.clone(),
        );

        let summary = svc.execute(&sources()).unwrap();
        assert_eq!(summary.catalogue_size, 0);
        assert_eq!(summary.result, AggregationResult::default());
        assert_eq!(summary.diagnostics.len(), 2);
        assert_eq!(writer.reports.borrow().len(), 1);
    }
}
