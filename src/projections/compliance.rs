use crate::error::{AnalysisError, Result};
use crate::models::{ComplianceStatus, ComplianceSummary, ComplianceVerdict, EventLog};

/// Strict comparison of every case against the reference sequence.
///
/// Only an exact match (same activities, same order, same length) is
/// compliant; extra or missing steps are not.
pub fn check_compliance(log: &EventLog, reference: &[String]) -> Result<ComplianceSummary> {
    if reference.is_empty() {
        return Err(AnalysisError::NoReferenceSequence);
    }

    let verdicts: Vec<ComplianceVerdict> = log
        .cases()
        .iter()
        .map(|case| {
            let actual = case.activity_sequence();
            let status = if actual.iter().copied().eq(reference.iter().map(String::as_str)) {
                ComplianceStatus::Compliant
            } else {
                ComplianceStatus::NonCompliant
            };
            ComplianceVerdict {
                case_id: case.case_id.to_string(),
                status,
                actual: actual.into_iter().map(str::to_string).collect(),
                expected: reference.to_vec(),
            }
        })
        .collect();

    let compliant = verdicts
        .iter()
        .filter(|v| v.status == ComplianceStatus::Compliant)
        .count();
    let non_compliant = verdicts.len() - compliant;
    let compliance_rate = if verdicts.is_empty() {
        0.0
    } else {
        compliant as f64 / verdicts.len() as f64 * 100.0
    };

    tracing::debug!(compliant, non_compliant, "compliance analysis complete");

    Ok(ComplianceSummary {
        verdicts,
        compliant,
        non_compliant,
        compliance_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::log_of_sequences;

    fn reference() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    fn status_of(summary: &ComplianceSummary, case_id: &str) -> ComplianceStatus {
        summary
            .verdicts
            .iter()
            .find(|v| v.case_id == case_id)
            .map(|v| v.status)
            .unwrap()
    }

    #[test]
    fn test_exact_match_only() {
        let log = log_of_sequences(&[
            ("exact", &["A", "B", "C"]),
            ("missing", &["A", "B"]),
            ("extra", &["A", "B", "C", "D"]),
            ("reordered", &["A", "C", "B"]),
        ]);
        let summary = check_compliance(&log, &reference()).unwrap();

        assert_eq!(status_of(&summary, "exact"), ComplianceStatus::Compliant);
        assert_eq!(status_of(&summary, "missing"), ComplianceStatus::NonCompliant);
        assert_eq!(status_of(&summary, "extra"), ComplianceStatus::NonCompliant);
        assert_eq!(status_of(&summary, "reordered"), ComplianceStatus::NonCompliant);
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.non_compliant, 3);
        assert_eq!(summary.compliance_rate, 25.0);
    }

    #[test]
    fn test_verdict_carries_sequences() {
        let log = log_of_sequences(&[("C1", &["A", "B"])]);
        let summary = check_compliance(&log, &reference()).unwrap();

        let verdict = &summary.verdicts[0];
        assert_eq!(verdict.actual, vec!["A", "B"]);
        assert_eq!(verdict.expected, reference());
    }

    #[test]
    fn test_missing_reference_is_configuration_error() {
        let log = log_of_sequences(&[("C1", &["A"])]);
        let err = check_compliance(&log, &[]).unwrap_err();

        assert!(matches!(err, AnalysisError::NoReferenceSequence));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_log() {
        let summary = check_compliance(&EventLog::default(), &reference()).unwrap();
        assert!(summary.verdicts.is_empty());
        assert_eq!(summary.compliant, 0);
        assert_eq!(summary.compliance_rate, 0.0);
    }
}
