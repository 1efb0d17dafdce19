use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AnalysisError, Field, Result};

/// One row of the event log
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Event {
    pub case_id: String,
    pub activity: String,
    #[serde(serialize_with = "timestamp_format::serialize")]
    pub timestamp: NaiveDateTime,
}

impl Event {
    pub fn new(case_id: impl Into<String>, activity: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            case_id: case_id.into(),
            activity: activity.into(),
            timestamp,
        }
    }
}

/// Wire format for timestamps: "YYYY-MM-DD HH:MM:SS"
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }
}

/// case_id, activity, timestamp
pub const EVENT_COLUMNS: usize = 3;

/// Validated, immutable event table
///
/// Rows keep their input order; every analysis derives its cases from here.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<Event>,
    /// Width of the source table, extra columns included
    columns: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            columns: EVENT_COLUMNS,
        }
    }
}

impl EventLog {
    /// Build a log, rejecting the batch if any row has an empty case id or activity.
    pub fn new(events: Vec<Event>) -> Result<Self> {
        for (idx, event) in events.iter().enumerate() {
            if event.case_id.trim().is_empty() {
                return Err(AnalysisError::malformed(idx + 1, Field::CaseId, "is empty"));
            }
            if event.activity.trim().is_empty() {
                return Err(AnalysisError::malformed(idx + 1, Field::Activity, "is empty"));
            }
        }
        Ok(Self {
            events,
            columns: EVENT_COLUMNS,
        })
    }

    /// Record the width of the uploaded table; never less than the required columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(EVENT_COLUMNS);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Cases in first-appearance order, each sorted by timestamp.
    /// The sort is stable, so equal timestamps keep row order.
    pub fn cases(&self) -> Vec<Case<'_>> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut cases: Vec<Case<'_>> = Vec::new();

        for event in &self.events {
            let slot = *index.entry(event.case_id.as_str()).or_insert_with(|| {
                cases.push(Case {
                    case_id: event.case_id.as_str(),
                    events: Vec::new(),
                });
                cases.len() - 1
            });
            cases[slot].events.push(event);
        }

        for case in &mut cases {
            case.events.sort_by_key(|e| e.timestamp);
        }

        cases
    }
}

/// Events of one process instance, in chronological order
#[derive(Debug, Clone)]
pub struct Case<'a> {
    pub case_id: &'a str,
    pub events: Vec<&'a Event>,
}

impl<'a> Case<'a> {
    pub fn activity_sequence(&self) -> Vec<&'a str> {
        self.events.iter().map(|e| e.activity.as_str()).collect()
    }
}

/// Unit used when reporting durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
}

impl TimeUnit {
    pub fn convert_seconds(self, seconds: f64) -> f64 {
        match self {
            TimeUnit::Seconds => seconds,
            TimeUnit::Minutes => seconds / 60.0,
            TimeUnit::Hours => seconds / 3600.0,
        }
    }
}

/// Mean inter-event duration attributed to an activity
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ActivityDuration {
    pub activity: String,
    /// `None` when the activity only ever opened a case
    pub mean_duration: Option<f64>,
    pub samples: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BottleneckReport {
    pub unit: TimeUnit,
    pub activities: Vec<ActivityDuration>,
    pub slowest_activity: Option<String>,
}

/// Activity seen two or more times within one case
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct LoopOccurrence {
    pub case_id: String,
    pub activity: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct VariantCount {
    pub sequence: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ComplianceVerdict {
    pub case_id: String,
    pub status: ComplianceStatus,
    pub actual: Vec<String>,
    pub expected: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ComplianceSummary {
    pub verdicts: Vec<ComplianceVerdict>,
    pub compliant: usize,
    pub non_compliant: usize,
    /// Percentage of compliant cases, 0 for an empty log
    pub compliance_rate: f64,
}

/// Summary shown before the analyses
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DataOverview {
    pub rows: usize,
    pub columns: usize,
    pub cases: usize,
    pub activities: usize,
    pub preview: Vec<Event>,
}

/// Everything one analysis run produces
#[derive(Debug, Serialize, Clone)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub overview: DataOverview,
    pub bottlenecks: BottleneckReport,
    pub loops: Vec<LoopOccurrence>,
    pub variants: Vec<VariantCount>,
    pub total_variants: usize,
    pub compliance: ComplianceSummary,
}

/// API Response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
}
