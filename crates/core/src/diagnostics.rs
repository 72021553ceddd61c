use std::fmt;

use tracing::{error, warn};

/// Which pipeline stage rejected the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Catalogue,
    Sales,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Catalogue => f.write_str("catalogue"),
            Stage::Sales => f.write_str("sales"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A single record was skipped
    Warning,
    /// The whole input was unusable
    Error,
}

/// What a diagnostic points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Input,
    Index(usize),
    Key(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Input => f.write_str("input"),
            Subject::Index(index) => write!(f, "record {index}"),
            Subject::Key(key) => write!(f, "'{key}'"),
        }
    }
}

/// The validation gate that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    NotAList,
    NotARecord,
    MissingTitle,
    InvalidTitle,
    MissingPrice,
    InvalidPrice,
    MissingProduct,
    MissingQuantity,
    InvalidQuantity,
    UnknownProduct,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::NotAList => "not_a_list",
            ReasonCode::NotARecord => "not_a_record",
            ReasonCode::MissingTitle => "missing_title",
            ReasonCode::InvalidTitle => "invalid_title",
            ReasonCode::MissingPrice => "missing_price",
            ReasonCode::InvalidPrice => "invalid_price",
            ReasonCode::MissingProduct => "missing_product",
            ReasonCode::MissingQuantity => "missing_quantity",
            ReasonCode::InvalidQuantity => "invalid_quantity",
            ReasonCode::UnknownProduct => "unknown_product",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single failed gate, before it is attached to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub reason: ReasonCode,
    pub detail: String,
}

impl ValidationFailure {
    pub fn new(reason: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

/// A rejected record or input, kept out of band from the pipeline result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub subject: Subject,
    pub reason: ReasonCode,
    pub detail: String,
}

impl Diagnostic {
    /// Whole-input failure: the stage produced a degraded, empty result
    pub fn input_rejected(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            severity: Severity::Error,
            subject: Subject::Input,
            reason: ReasonCode::NotAList,
            detail: detail.into(),
        }
    }

    /// Per-record failure: the record was skipped
    pub fn skipped(stage: Stage, subject: Subject, failure: ValidationFailure) -> Self {
        Self {
            stage,
            severity: Severity::Warning,
            subject,
            reason: failure.reason,
            detail: failure.detail,
        }
    }

    /// Emits the diagnostic on the tracing channel
    pub fn trace(&self) {
        let stage = self.stage.to_string();
        let subject = self.subject.to_string();
        match self.severity {
            Severity::Warning => warn!(
                stage = %stage,
                subject = %subject,
                reason = %self.reason,
                "{}. Skipping.",
                self.detail
            ),
            Severity::Error => error!(
                stage = %stage,
                subject = %subject,
                reason = %self.reason,
                "{}",
                self.detail
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}: {}", self.stage, self.subject, self.reason, self.detail)
    }
}
