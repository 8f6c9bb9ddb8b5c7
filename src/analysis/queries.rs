//! Derived queries over the aggregated statistics.
//!
//! Pure, stateless transforms consumed by the rendering layer: the
//! best-performing method per subject and the pooled per-method mean.

use crate::models::{LongRecord, MethodMean, SummaryRow};
use std::collections::BTreeMap;

/// Subjects in display order: first occurrence in the long table.
///
/// The long table is built in spreadsheet column order, so this preserves
/// the original column order rather than sorting alphabetically.
pub fn subjects_in_order(long: &[LongRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in long {
        if !seen.contains(&record.subject) {
            seen.push(record.subject.clone());
        }
    }
    seen
}

/// For each subject, the summary row with the highest mean.
///
/// Ties keep the earlier row in partition order. Output follows
/// `subject_order`; subjects with no summary row are skipped.
pub fn best_method_per_subject(
    summary: &[SummaryRow],
    subject_order: &[String],
) -> Vec<SummaryRow> {
    subject_order
        .iter()
        .filter_map(|subject| {
            let mut best: Option<&SummaryRow> = None;
            for row in summary.iter().filter(|r| &r.subject == subject) {
                match best {
                    Some(current) if row.mean <= current.mean => {}
                    _ => best = Some(row),
                }
            }
            best.cloned()
        })
        .collect()
}

/// Pooled mean score per teaching method across all subjects.
///
/// Computed directly from the long records, so it is a population-level
/// mean over all pooled observations, not an average of per-subject means.
pub fn overall_mean_per_method(long: &[LongRecord]) -> Vec<MethodMean> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for record in long {
        let entry = sums.entry(record.teaching_method.clone()).or_insert((0.0, 0));
        entry.0 += record.score;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(teaching_method, (sum, count))| MethodMean {
            teaching_method,
            mean: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(method: &str, subject: &str, count: usize, mean: f64) -> SummaryRow {
        SummaryRow {
            teaching_method: method.to_string(),
            subject: subject.to_string(),
            count,
            mean,
            median: mean,
            mode: Some(mean),
            std_dev: None,
            variance: None,
            range: 0.0,
            iqr: 0.0,
            ci: None,
        }
    }

    fn long(method: &str, subject: &str, score: f64) -> LongRecord {
        LongRecord {
            student_id: "1".to_string(),
            teaching_method: method.to_string(),
            subject: subject.to_string(),
            score,
        }
    }

    #[test]
    fn test_best_method_per_subject_picks_max_mean() {
        let summary = vec![
            row("Facilitator", "English", 3, 82.0),
            row("Group Learning", "English", 3, 88.0),
            row("Facilitator", "Math", 3, 91.0),
            row("Group Learning", "Math", 3, 85.0),
        ];
        let order = vec!["English".to_string(), "Math".to_string()];

        let best = best_method_per_subject(&summary, &order);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].teaching_method, "Group Learning");
        assert_eq!(best[1].teaching_method, "Facilitator");

        // Winner dominates every other row for the same subject
        for winner in &best {
            for other in summary.iter().filter(|r| r.subject == winner.subject) {
                assert!(winner.mean >= other.mean);
            }
        }
    }

    #[test]
    fn test_best_method_tie_keeps_first_in_partition_order() {
        let summary = vec![
            row("Facilitator", "English", 3, 85.0),
            row("Group Learning", "English", 3, 85.0),
        ];
        let order = vec!["English".to_string()];

        let best = best_method_per_subject(&summary, &order);
        assert_eq!(best[0].teaching_method, "Facilitator");
    }

    #[test]
    fn test_overall_mean_pools_observations() {
        // Unbalanced subjects: English has two observations, Math one.
        // Pooled mean is (80 + 90 + 60) / 3 = 76.67, not the average of
        // per-subject means ((85 + 60) / 2 = 72.5).
        let records = vec![
            long("Facilitator", "English", 80.0),
            long("Facilitator", "English", 90.0),
            long("Facilitator", "Math", 60.0),
        ];

        let means = overall_mean_per_method(&records);
        assert_eq!(means.len(), 1);
        assert!((means[0].mean - 230.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_subjects_in_order_preserves_first_occurrence() {
        let records = vec![
            long("Facilitator", "English", 80.0),
            long("Facilitator", "Math", 70.0),
            long("Group Learning", "English", 85.0),
            long("Group Learning", "Chemistry", 75.0),
        ];

        assert_eq!(
            subjects_in_order(&records),
            vec!["English", "Math", "Chemistry"]
        );
    }
}
