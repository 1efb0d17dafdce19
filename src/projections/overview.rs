use std::collections::HashSet;

use crate::models::{DataOverview, EventLog};

pub const PREVIEW_ROWS: usize = 5;

pub fn summarize(log: &EventLog) -> DataOverview {
    let events = log.events();
    let cases: HashSet<&str> = events.iter().map(|e| e.case_id.as_str()).collect();
    let activities: HashSet<&str> = events.iter().map(|e| e.activity.as_str()).collect();

    DataOverview {
        rows: events.len(),
        columns: log.columns(),
        cases: cases.len(),
        activities: activities.len(),
        preview: events.iter().take(PREVIEW_ROWS).cloned().collect(),
    }
}
