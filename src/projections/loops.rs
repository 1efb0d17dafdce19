use std::collections::HashMap;

use crate::models::{EventLog, LoopOccurrence};

/// Activities occurring two or more times anywhere within a case.
///
/// Cases follow first appearance in the log, activities first appearance
/// within their case.
pub fn detect_loops(log: &EventLog) -> Vec<LoopOccurrence> {
    let mut loops = Vec::new();

    for case in log.cases() {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();

        for activity in case.activity_sequence() {
            match slots.get(activity) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(activity, counts.len());
                    counts.push((activity, 1));
                }
            }
        }

        loops.extend(
            counts
                .into_iter()
                .filter(|(_, count)| *count >= 2)
                .map(|(activity, count)| LoopOccurrence {
                    case_id: case.case_id.to_string(),
                    activity: activity.to_string(),
                    count,
                }),
        );
    }

    tracing::debug!(occurrences = loops.len(), "loop detection complete");
    loops
}
