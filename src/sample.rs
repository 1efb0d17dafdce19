use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::error::Result;
use crate::models::{Event, EventLog};

/// Happy path every generated case walks through
pub const SAMPLE_ACTIVITIES: [&str; 4] = ["Start", "Review", "Approve", "End"];

/// Generate a small demo log.
///
/// Each case starts 1-30 days before `now`; each following step comes
/// 5-60 minutes after the previous one.
pub fn generate_sample_log<R: Rng>(rng: &mut R, now: NaiveDateTime, cases: usize) -> Result<EventLog> {
    let mut events = Vec::with_capacity(cases * SAMPLE_ACTIVITIES.len());

    for n in 1..=cases {
        let case_id = format!("Case_{}", n);
        let mut at = now - Duration::days(rng.random_range(1..=30));
        for activity in SAMPLE_ACTIVITIES {
            events.push(Event::new(case_id.clone(), activity, at));
            at += Duration::minutes(rng.random_range(5..=60));
        }
    }

    EventLog::new(events)
}
