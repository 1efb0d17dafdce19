//! Views derived from an event log.
//!
//! Each analysis is a pure function of an immutable [`EventLog`]; nothing is
//! cached between runs.

pub mod bottlenecks;
pub mod compliance;
pub mod loops;
pub mod overview;
pub mod variants;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{AnalysisReport, EventLog, TimeUnit};

pub use bottlenecks::analyze_bottlenecks;
pub use compliance::check_compliance;
pub use loops::detect_loops;
pub use overview::summarize;
pub use variants::rank_variants;

/// Caller-supplied settings for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisParams {
    pub time_unit: TimeUnit,
    pub reference_sequence: Vec<String>,
}

/// Run every analysis over one log.
///
/// Fails as a whole if any analysis fails; the report is never partial.
/// `top_variants` only limits how many variants are kept in the report.
pub fn analyze(log: &EventLog, params: &AnalysisParams, top_variants: usize) -> Result<AnalysisReport> {
    let run_id = Uuid::new_v4();
    let _span = tracing::info_span!("analysis", %run_id, events = log.len()).entered();
    if log.is_empty() {
        tracing::debug!("empty event log, all views will be empty");
    }

    let compliance = check_compliance(log, &params.reference_sequence)?;
    let overview = summarize(log);
    let bottlenecks = analyze_bottlenecks(log, params.time_unit);
    let loops = detect_loops(log);
    let ranked = rank_variants(log);

    tracing::info!(
        cases = overview.cases,
        variants = ranked.len(),
        loops = loops.len(),
        non_compliant = compliance.non_compliant,
        "analysis finished"
    );

    Ok(AnalysisReport {
        run_id,
        overview,
        bottlenecks,
        loops,
        total_variants: ranked.len(),
        variants: variants::top(&ranked, top_variants).to_vec(),
        compliance,
    })
}
