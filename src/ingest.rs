use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{AnalysisError, Field, Result};
use crate::models::{timestamp_format, Event, EventLog};

pub const REQUIRED_COLUMNS: [&str; 3] = ["case_id", "activity", "timestamp"];

/// Accepted in addition to the canonical "YYYY-MM-DD HH:MM:SS"
const ALTERNATE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Row as it appears in the upload, before validation
#[derive(Debug, Deserialize)]
struct RawEvent {
    case_id: Option<String>,
    activity: Option<String>,
    timestamp: Option<String>,
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    std::iter::once(timestamp_format::FORMAT)
        .chain(ALTERNATE_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn required(value: Option<String>, row: usize, field: Field) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AnalysisError::malformed(row, field, "is missing")),
    }
}

/// Parse an uploaded CSV event log.
///
/// Extra columns are not analysed but count towards the reported table
/// width. The first invalid row rejects the whole upload;
/// rows are numbered from 1, not counting the header.
pub fn parse_csv(data: &[u8]) -> Result<EventLog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AnalysisError::MissingColumn(column.to_string()));
        }
    }

    let mut events = Vec::new();
    for (idx, record) in reader.deserialize::<RawEvent>().enumerate() {
        let row = idx + 1;
        let raw = record?;

        let case_id = required(raw.case_id, row, Field::CaseId)?;
        let activity = required(raw.activity, row, Field::Activity)?;
        let timestamp = required(raw.timestamp, row, Field::Timestamp)?;
        let timestamp = parse_timestamp(&timestamp).ok_or_else(|| {
            AnalysisError::malformed(
                row,
                Field::Timestamp,
                format!("'{}' is not a YYYY-MM-DD HH:MM:SS timestamp", timestamp),
            )
        })?;

        events.push(Event::new(case_id, activity, timestamp));
    }

    tracing::debug!(rows = events.len(), columns = headers.len(), "parsed event log upload");
    Ok(EventLog::new(events)?.with_columns(headers.len()))
}

/// Render a log back to CSV with the canonical column order
pub fn to_csv(log: &EventLog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REQUIRED_COLUMNS)?;
    for event in log.events() {
        let timestamp = event.timestamp.format(timestamp_format::FORMAT).to_string();
        writer.write_record([event.case_id.as_str(), event.activity.as_str(), timestamp.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ts;

    fn expect_malformed(err: AnalysisError) -> (usize, Field) {
        match err {
            AnalysisError::MalformedRow { row, field, .. } => (row, field),
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_valid_csv() {
        let csv = "case_id,activity,timestamp\n\
                   Case_1,Start,2024-01-01 10:00:00\n\
                   Case_1,End,2024-01-01 10:30:00\n";
        let log = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[1].activity, "End");
        assert_eq!(log.events()[1].timestamp, ts("2024-01-01 10:30:00"));
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let csv = "resource,timestamp,activity,case_id\n\
                   alice, 2024-01-01 10:00:00 , Start , C1\n";
        let log = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(log.events()[0].case_id, "C1");
        assert_eq!(log.events()[0].activity, "Start");
        assert_eq!(log.columns(), 4);
    }

    #[test]
    fn test_header_only_is_empty_log() {
        let log = parse_csv(b"case_id,activity,timestamp\n").unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let err = parse_csv(b"case_id,activity\nC1,Start\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(ref c) if c == "timestamp"));
    }

    #[test]
    fn test_empty_activity_rejects_batch() {
        let csv = "case_id,activity,timestamp\n\
                   C1,Start,2024-01-01 10:00:00\n\
                   C1,,2024-01-01 10:05:00\n\
                   C1,End,2024-01-01 10:10:00\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(expect_malformed(err), (2, Field::Activity));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let csv = "case_id,activity,timestamp\nC1,Start,yesterday\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(expect_malformed(err), (1, Field::Timestamp));
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let mut csv = b"case_id,activity,timestamp\nC1,Caf".to_vec();
        csv.extend_from_slice(&[0xE9]);
        csv.extend_from_slice(b",2024-01-01 10:00:00\n");

        let err = parse_csv(&csv).unwrap_err();
        assert_eq!(err.kind(), "csv");
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "case_id,activity,timestamp\nC1,Start\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), "csv");
    }

    #[test]
    fn test_alternate_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-01T10:00:00"), Some(ts("2024-01-01 10:00:00")));
        assert!(parse_timestamp("2024-01-01 10:00:00.250").is_some());
        assert_eq!(parse_timestamp("01/01/2024"), None);
    }

    #[test]
    fn test_to_csv_reparses() {
        let csv = "case_id,activity,timestamp\nC1,Start,2024-01-01 10:00:00\n";
        let log = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(to_csv(&log).unwrap(), csv);
    }
}
