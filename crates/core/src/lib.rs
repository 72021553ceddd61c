//! Price catalogue and sales aggregation core.
//!
//! The two pipeline stages, [`catalogue::CatalogueBuilder`] and
//! [`sales::SalesAggregator`], never fail on bad records: they return a
//! [`domain::Validated`] value with the skipped entries listed as
//! diagnostics. Only whole-source failures, reported through the ports,
//! stop a run.

pub mod application;
pub mod catalogue;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod fields;
pub mod ports;
pub mod sales;
pub mod utils;

pub use catalogue::CatalogueBuilder;
pub use diagnostics::{Diagnostic, ReasonCode, Severity, Stage, Subject, ValidationFailure};
pub use domain::{AggregationResult, PriceCatalogue, RunSources, SaleLineItem, SalesReport, Validated};
pub use error::{LoadError, PipelineError, ReportError};
pub use sales::SalesAggregator;
