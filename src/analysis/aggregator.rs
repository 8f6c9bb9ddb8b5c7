//! Grouped descriptive-statistics aggregation.
//!
//! This module reshapes wide score records into long form and computes one
//! [`SummaryRow`] of descriptive statistics per (TeachingMethod, Subject)
//! partition. The whole pipeline is pure: same input, same output, no
//! side effects.

use crate::analysis::stats;
use crate::models::{LongRecord, ScoreRecord, SummaryRow};
use std::collections::BTreeMap;

/// Unpivots each record's five subject columns into long-form rows.
///
/// Every [`ScoreRecord`] yields exactly five [`LongRecord`]s, one per
/// subject, with the trailing `"Score"` suffix stripped from the label
/// ("EnglishScore" becomes "English").
pub fn melt(records: &[ScoreRecord]) -> Vec<LongRecord> {
    let mut long = Vec::with_capacity(records.len() * 5);

    for record in records {
        for (column, score) in record.subject_scores() {
            long.push(LongRecord {
                student_id: record.student_id.clone(),
                teaching_method: record.teaching_method.clone(),
                subject: subject_label(column).to_string(),
                score,
            });
        }
    }

    long
}

/// Strips a trailing `"Score"` suffix from a column name.
pub fn subject_label(column: &str) -> &str {
    column.strip_suffix("Score").unwrap_or(column)
}

/// Computes descriptive statistics per (TeachingMethod, Subject) pair.
///
/// Convenience wrapper: melts the records, then aggregates the long form.
pub fn aggregate(records: &[ScoreRecord]) -> Vec<SummaryRow> {
    aggregate_long(&melt(records))
}

/// Computes descriptive statistics from long-form records.
///
/// Partitions are keyed by (TeachingMethod, Subject) and emitted in sorted
/// key order, so the output is deterministic regardless of input order.
/// Only partitions with at least one record produce a row; single-record
/// partitions carry `None` for the sample statistics.
pub fn aggregate_long(long: &[LongRecord]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();

    for record in long {
        groups
            .entry((record.teaching_method.clone(), record.subject.clone()))
            .or_default()
            .push(record.score);
    }

    groups
        .into_iter()
        .map(|((teaching_method, subject), mut scores)| {
            scores.sort_by(f64::total_cmp);
            summarize(teaching_method, subject, &scores)
        })
        .collect()
}

/// Builds one summary row from a sorted, non-empty score partition.
fn summarize(teaching_method: String, subject: String, sorted: &[f64]) -> SummaryRow {
    let count = sorted.len();
    let std_dev = stats::sample_std_dev(sorted);

    SummaryRow {
        teaching_method,
        subject,
        count,
        mean: stats::mean(sorted),
        median: stats::median(sorted),
        mode: stats::mode(sorted),
        std_dev,
        variance: stats::sample_variance(sorted),
        range: sorted[count - 1] - sorted[0],
        iqr: stats::percentile(sorted, 0.75) - stats::percentile(sorted, 0.25),
        ci: std_dev.map(|sd| stats::ci_half_width(sd, count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, method: &str, scores: [f64; 5]) -> ScoreRecord {
        ScoreRecord {
            student_id: id.to_string(),
            teaching_method: method.to_string(),
            english_score: scores[0],
            math_score: scores[1],
            chemistry_score: scores[2],
            physics_score: scores[3],
            biology_score: scores[4],
        }
    }

    #[test]
    fn test_melt_yields_five_rows_per_record() {
        let records = vec![
            record("1", "Facilitator", [80.0, 75.0, 70.0, 65.0, 60.0]),
            record("2", "Group Learning", [90.0, 85.0, 80.0, 75.0, 70.0]),
        ];

        let long = melt(&records);
        assert_eq!(long.len(), 5 * records.len());
    }

    #[test]
    fn test_melt_strips_score_suffix() {
        let records = vec![record("1", "Facilitator", [80.0; 5])];
        let long = melt(&records);

        let subjects: Vec<&str> = long.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(
            subjects,
            vec!["English", "Math", "Chemistry", "Physics", "Biology"]
        );
    }

    #[test]
    fn test_single_student_groups_have_undefined_spread() {
        // Two students under different methods: every partition has one
        // observation, so StdDev/Variance/CI are all undefined.
        let records = vec![
            record("1", "Lecture-Based Instruction", [80.0, 70.0, 60.0, 50.0, 40.0]),
            record("2", "Facilitator", [90.0, 80.0, 70.0, 60.0, 50.0]),
        ];

        let rows = aggregate(&records);
        assert_eq!(rows.len(), 10);

        let english: Vec<&SummaryRow> =
            rows.iter().filter(|r| r.subject == "English").collect();
        assert_eq!(english.len(), 2);

        for row in english {
            assert_eq!(row.count, 1);
            let expected = if row.teaching_method == "Facilitator" {
                90.0
            } else {
                80.0
            };
            assert!((row.mean - expected).abs() < 1e-9);
            assert_eq!(row.std_dev, None);
            assert_eq!(row.variance, None);
            assert_eq!(row.ci, None);
            // Mode of a single observation is that observation
            assert_eq!(row.mode, Some(expected));
        }
    }

    #[test]
    fn test_three_student_group_statistics() {
        let records = vec![
            record("1", "Group Learning", [70.0, 60.0, 50.0, 40.0, 30.0]),
            record("2", "Group Learning", [80.0, 70.0, 60.0, 50.0, 40.0]),
            record("3", "Group Learning", [90.0, 80.0, 70.0, 60.0, 50.0]),
        ];

        let rows = aggregate(&records);
        let english = rows
            .iter()
            .find(|r| r.subject == "English")
            .expect("English partition");

        assert_eq!(english.count, 3);
        assert!((english.mean - 80.0).abs() < 1e-9);
        assert!((english.median - 80.0).abs() < 1e-9);
        assert!((english.range - 20.0).abs() < 1e-9);
        assert!((english.std_dev.unwrap() - 10.0).abs() < 1e-9);
        assert!((english.ci.unwrap() - 11.3160).abs() < 1e-3);
    }

    #[test]
    fn test_range_and_iqr_nonnegative() {
        let records = vec![
            record("1", "Facilitator", [55.0, 80.0, 62.0, 91.0, 47.0]),
            record("2", "Facilitator", [75.0, 60.0, 88.0, 51.0, 69.0]),
            record("3", "Group Learning", [63.0, 72.0, 59.0, 84.0, 77.0]),
        ];

        for row in aggregate(&records) {
            assert!(row.range >= 0.0);
            assert!(row.iqr >= 0.0);
        }
    }

    #[test]
    fn test_variance_matches_std_dev_squared() {
        let records = vec![
            record("1", "Facilitator", [55.0, 80.0, 62.0, 91.0, 47.0]),
            record("2", "Facilitator", [75.0, 60.0, 88.0, 51.0, 69.0]),
            record("3", "Facilitator", [63.0, 72.0, 59.0, 84.0, 77.0]),
        ];

        for row in aggregate(&records) {
            let sd = row.std_dev.unwrap();
            let var = row.variance.unwrap();
            assert!((var - sd * sd).abs() < 1e-9);
        }
    }

    #[test]
    fn test_aggregation_is_deterministic_over_long_form() {
        let records = vec![
            record("1", "Facilitator", [80.0, 75.0, 70.0, 65.0, 60.0]),
            record("2", "Group Learning", [90.0, 85.0, 80.0, 75.0, 70.0]),
            record("3", "Facilitator", [85.0, 70.0, 75.0, 60.0, 65.0]),
        ];

        let long = melt(&records);
        let first = aggregate_long(&long);
        let second = aggregate_long(&long);
        assert_eq!(first, second);

        // Input order of the long rows does not matter either
        let mut reversed = long.clone();
        reversed.reverse();
        assert_eq!(aggregate_long(&reversed), first);
    }

    #[test]
    fn test_partitions_emitted_in_sorted_key_order() {
        let records = vec![
            record("1", "Group Learning", [80.0; 5]),
            record("2", "Facilitator", [90.0; 5]),
        ];

        let rows = aggregate(&records);
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.teaching_method.as_str(), r.subject.as_str()))
            .collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
