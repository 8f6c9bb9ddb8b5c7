//! Markdown and JSON report generation.
//!
//! This module renders the dashboard report model as a Markdown document
//! (for terminals and version control) or as pretty-printed JSON.

use crate::models::{fmt_stat, DashboardReport, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &DashboardReport, decimals: usize) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Teaching Method Effectiveness Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Full statistics table
    output.push_str(&generate_statistics_section(report, decimals));

    // Best method per subject
    output.push_str(&generate_best_methods_section(report, decimals));

    // Overall comparison
    output.push_str(&generate_overall_section(report, decimals));

    // MANOVA note
    output.push_str(&generate_manova_section(report));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source File:** `{}`\n", metadata.source_file));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Students:** {}\n", metadata.students));
    section.push_str(&format!("- **Observations:** {}\n", metadata.observations));
    section.push_str(&format!("- **Teaching Methods:** {}\n", metadata.methods));
    section.push_str(&format!("- **Subjects:** {}\n", metadata.subjects));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the full descriptive statistics table.
///
/// Undefined statistics (single-observation partitions) render as "N/A".
fn generate_statistics_section(report: &DashboardReport, decimals: usize) -> String {
    let mut section = String::new();

    section.push_str("## Descriptive Statistics\n\n");
    section.push_str(
        "| Teaching Method | Subject | Count | Mean | Median | Mode | StdDev | Variance \
         | Range | IQR | CI |\n",
    );
    section.push_str("|:---|:---|---:|---:|---:|---:|---:|---:|---:|---:|---:|\n");

    for row in &report.summary {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            row.teaching_method,
            row.subject,
            row.count,
            fmt_stat(Some(row.mean), decimals),
            fmt_stat(Some(row.median), decimals),
            fmt_stat(row.mode, decimals),
            fmt_stat(row.std_dev, decimals),
            fmt_stat(row.variance, decimals),
            fmt_stat(Some(row.range), decimals),
            fmt_stat(Some(row.iqr), decimals),
            fmt_stat(row.ci, decimals),
        ));
    }
    section.push('\n');

    section
}

/// Generate the best-method-per-subject table.
fn generate_best_methods_section(report: &DashboardReport, decimals: usize) -> String {
    if report.best_by_subject.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Best Method by Subject\n\n");
    section.push_str("| Subject | Teaching Method | Mean |\n");
    section.push_str("|:---|:---|---:|\n");

    for row in &report.best_by_subject {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            row.subject,
            row.teaching_method,
            fmt_stat(Some(row.mean), decimals),
        ));
    }
    section.push('\n');

    section
}

/// Generate the overall per-method comparison table.
fn generate_overall_section(report: &DashboardReport, decimals: usize) -> String {
    if report.overall_means.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Overall Method Comparison\n\n");
    section.push_str("| Teaching Method | Mean Score (all subjects) |\n");
    section.push_str("|:---|---:|\n");

    for method in &report.overall_means {
        section.push_str(&format!(
            "| {} | {} |\n",
            method.teaching_method,
            fmt_stat(Some(method.mean), decimals),
        ));
    }
    section.push('\n');

    section
}

/// Generate the MANOVA section.
fn generate_manova_section(report: &DashboardReport) -> String {
    let mut section = String::new();

    section.push_str("## MANOVA\n\n");
    section.push_str(&format!(
        "**P-value = {:e}** (significance threshold: {})\n\n",
        report.manova_p_value, report.alpha
    ));
    section.push_str(
        "This p-value is a pre-computed constant supplied by an external analysis; \
         it is not derived from the data in this report.\n\n",
    );

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by TeachDash*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MethodMean, SummaryRow};
    use chrono::Utc;

    fn create_test_report() -> DashboardReport {
        let metadata = ReportMetadata {
            source_file: "teaching_data.xlsx".to_string(),
            generated_at: Utc::now(),
            students: 3,
            observations: 15,
            methods: 2,
            subjects: 5,
            duration_seconds: 0.12,
        };

        DashboardReport {
            metadata,
            summary: vec![
                SummaryRow {
                    teaching_method: "Facilitator".to_string(),
                    subject: "English".to_string(),
                    count: 3,
                    mean: 80.0,
                    median: 80.0,
                    mode: Some(70.0),
                    std_dev: Some(10.0),
                    variance: Some(100.0),
                    range: 20.0,
                    iqr: 10.0,
                    ci: Some(11.316),
                },
                SummaryRow {
                    teaching_method: "Group Learning".to_string(),
                    subject: "English".to_string(),
                    count: 1,
                    mean: 90.0,
                    median: 90.0,
                    mode: Some(90.0),
                    std_dev: None,
                    variance: None,
                    range: 0.0,
                    iqr: 0.0,
                    ci: None,
                },
            ],
            best_by_subject: vec![SummaryRow {
                teaching_method: "Group Learning".to_string(),
                subject: "English".to_string(),
                count: 1,
                mean: 90.0,
                median: 90.0,
                mode: Some(90.0),
                std_dev: None,
                variance: None,
                range: 0.0,
                iqr: 0.0,
                ci: None,
            }],
            overall_means: vec![MethodMean {
                teaching_method: "Facilitator".to_string(),
                mean: 78.5,
            }],
            subject_order: vec!["English".to_string()],
            manova_p_value: 2.2e-16,
            alpha: 0.05,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, 2);

        assert!(markdown.contains("# Teaching Method Effectiveness Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Descriptive Statistics"));
        assert!(markdown.contains("## Best Method by Subject"));
        assert!(markdown.contains("## Overall Method Comparison"));
        assert!(markdown.contains("## MANOVA"));
        assert!(markdown.contains("Facilitator"));
    }

    #[test]
    fn test_statistics_table_rounds_and_marks_na() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, 2);

        assert!(markdown.contains("11.32"));
        // The single-observation partition renders undefined stats as N/A
        assert!(markdown.contains("| N/A |"));
        assert!(!markdown.contains("NaN"));
    }

    #[test]
    fn test_manova_section_states_injected_constant() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, 2);

        assert!(markdown.contains("2.2e-16"));
        assert!(markdown.contains("pre-computed constant"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"best_by_subject\""));
        assert!(json.contains("\"overall_means\""));
        // Undefined statistics serialize as null, not zero
        assert!(json.contains("\"std_dev\": null"));
    }
}
