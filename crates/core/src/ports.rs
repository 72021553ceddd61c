use serde_json::Value;

use crate::domain::SalesReport;
use crate::error::{LoadError, ReportError};

/// Supplies raw, not yet validated JSON for a named source
pub trait SourceLoader {
    fn load(&self, source_id: &str) -> Result<Value, LoadError>;
}

/// Renders and persists the outcome of a run
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ReportWriter {
    fn write(&self, report: &SalesReport) -> Result<(), ReportError>;
}
