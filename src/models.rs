//! Data models for the dashboard generator.
//!
//! This module contains the core data structures used throughout the
//! application: input records, long-form records, per-group summary
//! statistics, and the assembled report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five subject score columns, in spreadsheet column order.
///
/// This order is also the display order of subjects everywhere downstream,
/// matching the order in which the columns are unpivoted.
pub const SUBJECT_COLUMNS: [&str; 5] = [
    "EnglishScore",
    "MathScore",
    "ChemistryScore",
    "PhysicsScore",
    "BiologyScore",
];

/// Columns that must be present in the input sheet.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "StudentID",
    "TeachingMethod",
    "EnglishScore",
    "MathScore",
    "ChemistryScore",
    "PhysicsScore",
    "BiologyScore",
];

/// One input row: a single student with scores in all five subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Student identifier (kept as text; sheets store these as either
    /// numbers or strings).
    #[serde(rename = "StudentID")]
    pub student_id: String,
    /// Teaching method the student was taught under.
    #[serde(rename = "TeachingMethod")]
    pub teaching_method: String,
    #[serde(rename = "EnglishScore")]
    pub english_score: f64,
    #[serde(rename = "MathScore")]
    pub math_score: f64,
    #[serde(rename = "ChemistryScore")]
    pub chemistry_score: f64,
    #[serde(rename = "PhysicsScore")]
    pub physics_score: f64,
    #[serde(rename = "BiologyScore")]
    pub biology_score: f64,
}

impl ScoreRecord {
    /// Returns the five (column name, score) pairs in column order.
    pub fn subject_scores(&self) -> [(&'static str, f64); 5] {
        [
            ("EnglishScore", self.english_score),
            ("MathScore", self.math_score),
            ("ChemistryScore", self.chemistry_score),
            ("PhysicsScore", self.physics_score),
            ("BiologyScore", self.biology_score),
        ]
    }
}

/// One long-form row: a single (student, subject) observation.
///
/// Produced by unpivoting the five subject columns of a [`ScoreRecord`];
/// the trailing `"Score"` suffix is stripped from the subject label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub student_id: String,
    pub teaching_method: String,
    pub subject: String,
    pub score: f64,
}

/// Descriptive statistics for one (TeachingMethod, Subject) partition.
///
/// `std_dev`, `variance`, and `ci` are `None` when the partition holds a
/// single observation (sample statistics with an n−1 denominator are
/// undefined there). Consumers must render these as "N/A", never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub teaching_method: String,
    pub subject: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent score; smallest such value on ties.
    pub mode: Option<f64>,
    /// Sample standard deviation (n−1).
    pub std_dev: Option<f64>,
    /// Sample variance (n−1).
    pub variance: Option<f64>,
    /// max − min.
    pub range: f64,
    /// 75th − 25th percentile, linear interpolation.
    pub iqr: f64,
    /// 95% normal-approximation half-width: 1.96 × StdDev / √Count.
    pub ci: Option<f64>,
}

/// Pooled mean score for one teaching method across all subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodMean {
    pub teaching_method: String,
    pub mean: f64,
}

/// Metadata about a dashboard run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the input spreadsheet.
    pub source_file: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of students (input rows).
    pub students: usize,
    /// Number of long-form observations (5 × students).
    pub observations: usize,
    /// Distinct teaching methods seen in the input.
    pub methods: usize,
    /// Distinct subjects seen in the input.
    pub subjects: usize,
    /// Wall-clock duration of loading and aggregation, in seconds.
    pub duration_seconds: f64,
}

/// The complete dashboard report model.
///
/// Everything the rendering layer needs, in one immutable value; renderers
/// read it without further computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    /// One row per (TeachingMethod, Subject) partition, in sorted key order.
    pub summary: Vec<SummaryRow>,
    /// Best-performing method per subject, in subject display order.
    pub best_by_subject: Vec<SummaryRow>,
    /// Pooled mean per method, in sorted method order.
    pub overall_means: Vec<MethodMean>,
    /// Subjects in display (column) order.
    pub subject_order: Vec<String>,
    /// The externally supplied MANOVA p-value shown on the dashboard.
    ///
    /// This is an injected constant, not computed from the data.
    pub manova_p_value: f64,
    /// Significance threshold used to draw the decision zone.
    pub alpha: f64,
}

/// Formats an optional statistic, rendering `None` as "N/A".
pub fn fmt_stat(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_scores_column_order() {
        let record = ScoreRecord {
            student_id: "1".to_string(),
            teaching_method: "Facilitator".to_string(),
            english_score: 1.0,
            math_score: 2.0,
            chemistry_score: 3.0,
            physics_score: 4.0,
            biology_score: 5.0,
        };

        let scores = record.subject_scores();
        let columns: Vec<&str> = scores.iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, SUBJECT_COLUMNS);
        assert_eq!(scores[1], ("MathScore", 2.0));
    }

    #[test]
    fn test_fmt_stat() {
        assert_eq!(fmt_stat(Some(11.3157), 2), "11.32");
        assert_eq!(fmt_stat(Some(80.0), 2), "80.00");
        assert_eq!(fmt_stat(None, 2), "N/A");
    }
}
