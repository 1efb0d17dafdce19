use chrono::NaiveDateTime;

use crate::models::{timestamp_format, Event, EventLog};

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, timestamp_format::FORMAT).unwrap()
}

/// Build a log from (case_id, activity, timestamp) triples
pub fn log_from(rows: &[(&str, &str, &str)]) -> EventLog {
    let events = rows
        .iter()
        .map(|(case_id, activity, timestamp)| Event::new(*case_id, *activity, ts(timestamp)))
        .collect();
    EventLog::new(events).unwrap()
}

/// One case per sequence, events a minute apart
pub fn log_of_sequences(sequences: &[(&str, &[&str])]) -> EventLog {
    let base = ts("2024-01-01 08:00:00");
    let events = sequences
        .iter()
        .flat_map(|(case_id, activities)| {
            activities.iter().enumerate().map(move |(i, activity)| {
                Event::new(*case_id, *activity, base + chrono::Duration::minutes(i as i64))
            })
        })
        .collect();
    EventLog::new(events).unwrap()
}
