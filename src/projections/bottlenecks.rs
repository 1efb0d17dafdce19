use std::collections::BTreeMap;

use crate::models::{ActivityDuration, BottleneckReport, Case, EventLog, TimeUnit};

/// Seconds elapsed before each event of a case, keyed by the later activity.
/// A single-event case yields nothing.
pub fn transition_durations<'a>(case: &Case<'a>) -> Vec<(&'a str, f64)> {
    case.events
        .windows(2)
        .map(|pair| {
            let elapsed = pair[1].timestamp - pair[0].timestamp;
            (pair[1].activity.as_str(), elapsed.num_milliseconds() as f64 / 1000.0)
        })
        .collect()
}

/// Mean time spent reaching each activity, across all cases
pub fn analyze_bottlenecks(log: &EventLog, unit: TimeUnit) -> BottleneckReport {
    // (sum of seconds, sample count); BTreeMap keeps activities alphabetical
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for case in log.cases() {
        if let Some(first) = case.events.first() {
            totals.entry(first.activity.as_str()).or_insert((0.0, 0));
        }
        for (activity, seconds) in transition_durations(&case) {
            let entry = totals.entry(activity).or_insert((0.0, 0));
            entry.0 += seconds;
            entry.1 += 1;
        }
    }

    let activities: Vec<ActivityDuration> = totals
        .into_iter()
        .map(|(activity, (sum, samples))| ActivityDuration {
            activity: activity.to_string(),
            mean_duration: (samples > 0).then(|| unit.convert_seconds(sum / samples as f64)),
            samples,
        })
        .collect();

    // Strictly greater keeps the alphabetically first activity on ties
    let mut slowest: Option<&ActivityDuration> = None;
    for candidate in &activities {
        let Some(mean) = candidate.mean_duration else {
            continue;
        };
        match slowest.and_then(|s| s.mean_duration) {
            Some(best) if mean <= best => {}
            _ => slowest = Some(candidate),
        }
    }
    let slowest_activity = slowest.map(|a| a.activity.clone());

    tracing::debug!(
        activities = activities.len(),
        slowest = ?slowest_activity,
        "bottleneck analysis complete"
    );

    BottleneckReport {
        unit,
        activities,
        slowest_activity,
    }
}
