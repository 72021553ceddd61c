use std::io;

use thiserror::Error;

/// Whole-source failure raised by a `SourceLoader`
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source '{source_id}' not found")]
    NotFound { source_id: String },
    #[error("source '{source_id}' could not be read: {reason}")]
    Unreadable { source_id: String, reason: String },
    #[error("source '{source_id}' is not valid JSON: {reason}")]
    Malformed { source_id: String, reason: String },
}

impl LoadError {
    pub fn source_id(&self) -> &str {
        match self {
            LoadError::NotFound { source_id }
            | LoadError::Unreadable { source_id, .. }
            | LoadError::Malformed { source_id, .. } => source_id,
        }
    }
}

/// Failure to render or persist a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to '{target}': {error}")]
    Persist { target: String, error: io::Error },
    #[error("failed to display report: {0}")]
    Echo(#[source] io::Error),
}

/// Fatal pipeline failures; per-record problems never surface here
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load price catalogue")]
    CatalogueUnavailable(#[source] LoadError),
    #[error("failed to load sales records")]
    SalesUnavailable(#[source] LoadError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
