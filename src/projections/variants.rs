use std::collections::HashMap;

use crate::models::{EventLog, VariantCount};

/// All distinct activity sequences ranked by how many cases follow them.
///
/// Equal counts keep the order in which the sequence first appeared.
/// The full ranking is returned; use [`top`] to cut it down for display.
pub fn rank_variants(log: &EventLog) -> Vec<VariantCount> {
    let mut slots: HashMap<Vec<&str>, usize> = HashMap::new();
    let mut variants: Vec<(Vec<&str>, usize)> = Vec::new();

    for case in log.cases() {
        let sequence = case.activity_sequence();
        match slots.get(&sequence) {
            Some(&slot) => variants[slot].1 += 1,
            None => {
                slots.insert(sequence.clone(), variants.len());
                variants.push((sequence, 1));
            }
        }
    }

    // sort_by is stable
    variants.sort_by(|a, b| b.1.cmp(&a.1));

    tracing::debug!(variants = variants.len(), "variant analysis complete");

    variants
        .into_iter()
        .map(|(sequence, count)| VariantCount {
            sequence: sequence.into_iter().map(str::to_string).collect(),
            count,
        })
        .collect()
}

/// The `k` most frequent variants of a ranking
pub fn top(ranked: &[VariantCount], k: usize) -> &[VariantCount] {
    &ranked[..k.min(ranked.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::log_of_sequences;

    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ranked_by_count() {
        let log = log_of_sequences(&[
            ("C1", &["A", "B"]),
            ("C2", &["A", "B"]),
            ("C3", &["A", "C"]),
        ]);

        assert_eq!(
            rank_variants(&log),
            vec![
                VariantCount { sequence: seq(&["A", "B"]), count: 2 },
                VariantCount { sequence: seq(&["A", "C"]), count: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let log = log_of_sequences(&[
            ("C1", &["X"]),
            ("C2", &["Y"]),
            ("C3", &["Z"]),
            ("C4", &["Z"]),
            ("C5", &["Y"]),
        ]);
        let ranked = rank_variants(&log);
        let order: Vec<_> = ranked.iter().map(|v| (v.sequence[0].as_str(), v.count)).collect();

        assert_eq!(order, vec![("Y", 2), ("Z", 2), ("X", 1)]);
    }

    #[test]
    fn test_sequence_order_matters() {
        let log = log_of_sequences(&[("C1", &["A", "B"]), ("C2", &["B", "A"])]);
        assert_eq!(rank_variants(&log).len(), 2);
    }

    #[test]
    fn test_top_truncates() {
        let log = log_of_sequences(&[("C1", &["A"]), ("C2", &["B"]), ("C3", &["A"])]);
        let ranked = rank_variants(&log);

        assert_eq!(top(&ranked, 1), &ranked[..1]);
        assert_eq!(top(&ranked, 10).len(), 2);
        assert!(top(&ranked, 0).is_empty());
    }

    #[test]
    fn test_empty_log() {
        assert!(rank_variants(&EventLog::default()).is_empty());
    }
}
