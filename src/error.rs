use serde::Serialize;
use std::fmt;

/// Field of an event row that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CaseId,
    Activity,
    Timestamp,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::CaseId => "case_id",
            Field::Activity => "activity",
            Field::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by ingestion and the analysis engine
///
/// A failing row rejects the whole batch; nothing is skipped.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Malformed row {row}: {field} {reason}")]
    MalformedRow {
        row: usize,
        field: Field,
        reason: String,
    },

    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    #[error("Compliance analysis requires a non-empty reference sequence")]
    NoReferenceSequence,

    #[error("Invalid request parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub fn malformed(row: usize, field: Field, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedRow {
            row,
            field,
            reason: reason.into(),
        }
    }

    /// Stable identifier of the error kind, used in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MalformedRow { .. } => "malformed_row",
            AnalysisError::MissingColumn(_) => "missing_column",
            AnalysisError::NoReferenceSequence => "no_reference_sequence",
            AnalysisError::InvalidParameter(_) => "invalid_parameter",
            AnalysisError::Csv(_) => "csv",
        }
    }

    /// Caller configuration problems, as opposed to bad data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoReferenceSequence | AnalysisError::InvalidParameter(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
