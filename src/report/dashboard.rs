//! HTML dashboard generation.
//!
//! Renders the full report model as a single self-contained HTML page with
//! tabbed sections and Chart.js charts. All chart data is embedded as one
//! JSON blob; a small inline script builds the charts, including a plugin
//! that draws 95% CI error bars on the per-subject mean charts.

use crate::config::StyleConfig;
use crate::models::{fmt_stat, DashboardReport, SummaryRow};
use serde_json::json;

/// Generate the complete HTML dashboard.
pub fn generate_html_dashboard(
    report: &DashboardReport,
    style: &StyleConfig,
    decimals: usize,
) -> String {
    let data = chart_data(report, style);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Teaching Method Effectiveness Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
{css}
    </style>
</head>
<body class="theme-{theme}">
    <div class="container">
        <header class="header">
            <h1>🎓 Teaching Method Effectiveness Dashboard</h1>
            <p class="subtitle">Where educational theory meets statistical insight</p>
            <p class="timestamp">Generated: {timestamp} · {students} students · {observations} observations</p>
        </header>

        <nav class="nav-tabs">
            <button class="tab-button active" onclick="showTab('ci-plots')">🎯 CI Plots</button>
            <button class="tab-button" onclick="showTab('top-methods')">🥇 Top Methods</button>
            <button class="tab-button" onclick="showTab('overall')">📈 Overall Comparison</button>
            <button class="tab-button" onclick="showTab('breakdown')">📚 Subject Breakdown</button>
            <button class="tab-button" onclick="showTab('manova')">📊 MANOVA &amp; Stats</button>
            <button class="tab-button" onclick="showTab('summary-table')">📋 Raw Summary Table</button>
        </nav>

        <main>
{ci_section}
{top_section}
{overall_section}
{breakdown_section}
{manova_section}
{table_section}
        </main>
    </div>

    <script>
const DATA = {data};
{js}
    </script>
</body>
</html>"#,
        css = page_css(),
        theme = style.theme,
        timestamp = report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        students = report.metadata.students,
        observations = report.metadata.observations,
        ci_section = ci_plots_section(report),
        top_section = top_methods_section(),
        overall_section = overall_section(),
        breakdown_section = breakdown_section(),
        manova_section = manova_section(report),
        table_section = table_section(report, decimals),
        data = data,
        js = page_js(),
    )
}

/// Assemble every chart's data as one JSON value.
fn chart_data(report: &DashboardReport, style: &StyleConfig) -> serde_json::Value {
    // (a) Per-subject mean charts with CI error bars
    let ci_charts: Vec<serde_json::Value> = report
        .subject_order
        .iter()
        .map(|subject| {
            let rows: Vec<&SummaryRow> = report
                .summary
                .iter()
                .filter(|r| &r.subject == subject)
                .collect();
            json!({
                "subject": subject,
                "canvas": ci_canvas_id(subject),
                "methods": rows.iter().map(|r| &r.teaching_method).collect::<Vec<_>>(),
                "means": rows.iter().map(|r| r.mean).collect::<Vec<_>>(),
                "cis": rows.iter().map(|r| r.ci).collect::<Vec<_>>(),
                "color": style.subject_color(subject),
            })
        })
        .collect();

    // (b) Best method per subject
    let best = json!({
        "subjects": report.best_by_subject.iter().map(|r| &r.subject).collect::<Vec<_>>(),
        "methods": report.best_by_subject.iter().map(|r| &r.teaching_method).collect::<Vec<_>>(),
        "means": report.best_by_subject.iter().map(|r| r.mean).collect::<Vec<_>>(),
        "colors": report
            .best_by_subject
            .iter()
            .map(|r| style.method_color(&r.teaching_method))
            .collect::<Vec<_>>(),
    });

    // (c) Overall pooled mean per method
    let overall = json!({
        "methods": report.overall_means.iter().map(|m| &m.teaching_method).collect::<Vec<_>>(),
        "means": report.overall_means.iter().map(|m| m.mean).collect::<Vec<_>>(),
        "colors": report
            .overall_means
            .iter()
            .map(|m| style.method_color(&m.teaching_method))
            .collect::<Vec<_>>(),
    });

    // (d) Grouped bars: one dataset per method over all subjects
    let mut methods: Vec<&str> = Vec::new();
    for row in &report.summary {
        if !methods.contains(&row.teaching_method.as_str()) {
            methods.push(&row.teaching_method);
        }
    }
    let breakdown_datasets: Vec<serde_json::Value> = methods
        .iter()
        .map(|method| {
            let means: Vec<Option<f64>> = report
                .subject_order
                .iter()
                .map(|subject| {
                    report
                        .summary
                        .iter()
                        .find(|r| &r.teaching_method == method && &r.subject == subject)
                        .map(|r| r.mean)
                })
                .collect();
            json!({
                "label": method,
                "data": means,
                "backgroundColor": style.method_color(method),
            })
        })
        .collect();
    let breakdown = json!({
        "subjects": &report.subject_order,
        "datasets": breakdown_datasets,
    });

    json!({
        "theme": style.theme,
        "ciCharts": ci_charts,
        "best": best,
        "overall": overall,
        "breakdown": breakdown,
    })
}

/// Canvas element id for a subject's CI chart.
fn ci_canvas_id(subject: &str) -> String {
    format!(
        "ci-chart-{}",
        subject.to_lowercase().replace(|c: char| !c.is_alphanumeric(), "-")
    )
}

/// Section (a): one mean-with-CI chart per subject.
fn ci_plots_section(report: &DashboardReport) -> String {
    let mut section = String::new();

    section.push_str("            <section id=\"ci-plots\" class=\"tab-content active\">\n");
    section.push_str("                <h2>🎯 Confidence Intervals: Mean Scores by Method</h2>\n");
    section.push_str(
        "                <p class=\"caption\">Each bar shows the average student score for a \
         given subject and teaching method, including a 95% confidence interval.</p>\n",
    );

    for subject in &report.subject_order {
        section.push_str(&format!(
            "                <div class=\"chart-box\"><h3>{} – Mean Score with 95% CI</h3>\
             <canvas id=\"{}\"></canvas></div>\n",
            escape_html(subject),
            ci_canvas_id(subject)
        ));
    }

    section.push_str("            </section>\n");
    section
}

/// Section (b): best-performing method per subject.
fn top_methods_section() -> String {
    "            <section id=\"top-methods\" class=\"tab-content\">\n\
                     <h2>🥇 Top Performing Teaching Methods</h2>\n\
                     <p class=\"caption\">For each subject, the teaching method that yielded \
     the highest average score.</p>\n\
                     <div class=\"chart-box\"><canvas id=\"best-chart\"></canvas></div>\n\
                 </section>\n"
        .to_string()
}

/// Section (c): pooled mean per method.
fn overall_section() -> String {
    "            <section id=\"overall\" class=\"tab-content\">\n\
                     <h2>📈 Overall Teaching Method Comparison</h2>\n\
                     <p class=\"caption\">Average student score across all subjects for each \
     method.</p>\n\
                     <div class=\"chart-box\"><canvas id=\"overall-chart\"></canvas></div>\n\
                 </section>\n"
        .to_string()
}

/// Section (d): grouped bars over all (subject, method) pairs.
fn breakdown_section() -> String {
    "            <section id=\"breakdown\" class=\"tab-content\">\n\
                     <h2>📚 Score Breakdown by Subject and Method</h2>\n\
                     <p class=\"caption\">How each teaching method performed across different \
     subjects, side by side.</p>\n\
                     <div class=\"chart-box\"><canvas id=\"breakdown-chart\"></canvas></div>\n\
                 </section>\n"
        .to_string()
}

/// Section (e): the injected MANOVA p-value on a decision-zone strip.
///
/// The strip spans p in [0, 0.1]; the region below alpha is the
/// significant zone and the marker sits at the displayed p-value.
fn manova_section(report: &DashboardReport) -> String {
    let strip_max = 0.1;
    let alpha_pct = (report.alpha / strip_max * 100.0).clamp(0.0, 100.0);
    let marker_pct = (report.manova_p_value / strip_max * 100.0).clamp(0.0, 100.0);

    format!(
        "            <section id=\"manova\" class=\"tab-content\">\n\
                 <h2>📊 MANOVA Results &amp; Statistical Summary</h2>\n\
                 <div class=\"callout success\">The MANOVA test reveals a statistically \
         significant effect of teaching method on student scores.</div>\n\
                 <p class=\"pvalue\"><strong>P-value = {p:e}</strong> (pre-computed, supplied \
         externally; not derived from this dataset)</p>\n\
                 <div class=\"pvalue-strip\">\n\
                     <div class=\"zone significant\" style=\"width: {alpha_pct:.2}%\"></div>\n\
                     <div class=\"marker\" style=\"left: {marker_pct:.4}%\" \
         title=\"p = {p:e}\"></div>\n\
                 </div>\n\
                 <p class=\"strip-legend\">Green zone: p &lt; {alpha} (significant). \
         Marker: displayed p-value.</p>\n\
                 <h3>🏛️ Interpretation</h3>\n\
                 <ul>\n\
                     <li>The extremely low p-value indicates <strong>strong statistical \
         evidence</strong> that teaching methods influence student outcomes.</li>\n\
                     <li><strong>Different methods yield measurably different \
         performance</strong>.</li>\n\
                 </ul>\n\
                 <h3>MANOVA Framework</h3>\n\
                 <ul>\n\
                     <li><strong>H₀</strong>: Teaching styles have no effect on \
         performance.</li>\n\
                     <li><strong>H₁</strong>: At least one style significantly differs.</li>\n\
                     <li><strong>Conclusion</strong>: Reject H₀. Teaching method matters.</li>\n\
                 </ul>\n\
             </section>\n",
        p = report.manova_p_value,
        alpha = report.alpha,
        alpha_pct = alpha_pct,
        marker_pct = marker_pct,
    )
}

/// Section (f): the raw statistics table, rounded, with "N/A" for
/// undefined statistics.
fn table_section(report: &DashboardReport, decimals: usize) -> String {
    let mut section = String::new();

    section.push_str("            <section id=\"summary-table\" class=\"tab-content\">\n");
    section.push_str("                <h2>📋 Full Descriptive Statistics Table</h2>\n");
    section.push_str(
        "                <p class=\"caption\">Statistical summaries organized by subject and \
         method.</p>\n",
    );
    section.push_str("                <table class=\"stats-table\">\n");
    section.push_str(
        "                    <thead><tr><th>Teaching Method</th><th>Subject</th><th>Count</th>\
         <th>Mean</th><th>Median</th><th>Mode</th><th>StdDev</th><th>Variance</th>\
         <th>Range</th><th>IQR</th><th>CI</th></tr></thead>\n",
    );
    section.push_str("                    <tbody>\n");

    for row in &report.summary {
        section.push_str(&format!(
            "                    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.teaching_method),
            escape_html(&row.subject),
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

    section.push_str("                    </tbody>\n");
    section.push_str("                </table>\n");
    section.push_str("            </section>\n");
    section
}

/// Minimal HTML escaping for user-supplied labels.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Page stylesheet; the two themes only differ in the color variables.
fn page_css() -> &'static str {
    r#"        :root { --accent: #6B9080; }
        body.theme-dark {
            --bg: #111418; --panel: #1a1f24; --text: #e6e6e6; --muted: #9aa5a1;
            --border: #2c333a; --grid: rgba(230, 230, 230, 0.12);
        }
        body.theme-light {
            --bg: #f6f8f7; --panel: #ffffff; --text: #22302b; --muted: #5d6b66;
            --border: #d8e0dc; --grid: rgba(34, 48, 43, 0.12);
        }
        body { margin: 0; font-family: "Segoe UI", Helvetica, Arial, sans-serif;
               background: var(--bg); color: var(--text); }
        .container { max-width: 1100px; margin: 0 auto; padding: 24px; }
        .header h1 { margin-bottom: 4px; }
        .subtitle { color: var(--muted); font-style: italic; margin-top: 0; }
        .timestamp { color: var(--muted); font-size: 0.85em; }
        .nav-tabs { display: flex; flex-wrap: wrap; gap: 6px; margin: 18px 0;
                    border-bottom: 1px solid var(--border); padding-bottom: 8px; }
        .tab-button { background: var(--panel); color: var(--text);
                      border: 1px solid var(--border); border-radius: 6px;
                      padding: 8px 14px; cursor: pointer; }
        .tab-button.active { background: var(--accent); color: #ffffff;
                             border-color: var(--accent); }
        .tab-content { display: none; }
        .tab-content.active { display: block; }
        .caption { color: var(--muted); }
        .chart-box { background: var(--panel); border: 1px solid var(--border);
                     border-radius: 8px; padding: 16px; margin: 14px 0; }
        .callout.success { background: rgba(107, 144, 128, 0.18);
                           border-left: 4px solid var(--accent);
                           padding: 10px 14px; border-radius: 4px; }
        .pvalue-strip { position: relative; height: 34px; margin: 10px 0;
                        background: var(--border); border-radius: 4px; overflow: hidden; }
        .pvalue-strip .zone.significant { position: absolute; top: 0; bottom: 0; left: 0;
                                          background: #8fd19e; }
        .pvalue-strip .marker { position: absolute; top: 4px; bottom: 4px; width: 4px;
                                background: #d64545; border-radius: 2px; }
        .strip-legend { color: var(--muted); font-size: 0.85em; }
        .stats-table { width: 100%; border-collapse: collapse; background: var(--panel); }
        .stats-table th, .stats-table td { border: 1px solid var(--border);
                                           padding: 6px 10px; text-align: right; }
        .stats-table th:first-child, .stats-table td:first-child,
        .stats-table th:nth-child(2), .stats-table td:nth-child(2) { text-align: left; }
        .stats-table thead th { background: var(--accent); color: #ffffff; }"#
}

/// Inline script: tab switching, the CI error-bar plugin, and chart setup.
fn page_js() -> &'static str {
    r#"function showTab(id) {
    document.querySelectorAll('.tab-content').forEach(el => el.classList.remove('active'));
    document.querySelectorAll('.tab-button').forEach(el => el.classList.remove('active'));
    document.getElementById(id).classList.add('active');
    const button = Array.from(document.querySelectorAll('.tab-button'))
        .find(b => b.getAttribute('onclick').includes("'" + id + "'"));
    if (button) button.classList.add('active');
}

const gridColor = getComputedStyle(document.body).getPropertyValue('--grid').trim();
const textColor = getComputedStyle(document.body).getPropertyValue('--text').trim();
Chart.defaults.color = textColor;

// Draws vertical 95% CI whiskers using the `ci` array on the dataset.
// Entries that are null (undefined CI, e.g. single-observation groups)
// simply get no whisker.
const ciErrorBars = {
    id: 'ciErrorBars',
    afterDatasetsDraw(chart) {
        const ctx = chart.ctx;
        chart.data.datasets.forEach((dataset, di) => {
            if (!dataset.ci) return;
            const meta = chart.getDatasetMeta(di);
            meta.data.forEach((bar, i) => {
                const ci = dataset.ci[i];
                if (ci === null || ci === undefined) return;
                const yScale = chart.scales.y;
                const top = yScale.getPixelForValue(dataset.data[i] + ci);
                const bottom = yScale.getPixelForValue(dataset.data[i] - ci);
                ctx.save();
                ctx.strokeStyle = textColor;
                ctx.lineWidth = 1.5;
                ctx.beginPath();
                ctx.moveTo(bar.x, top);
                ctx.lineTo(bar.x, bottom);
                ctx.moveTo(bar.x - 5, top);
                ctx.lineTo(bar.x + 5, top);
                ctx.moveTo(bar.x - 5, bottom);
                ctx.lineTo(bar.x + 5, bottom);
                ctx.stroke();
                ctx.restore();
            });
        });
    }
};

function barOptions(showLegend) {
    return {
        responsive: true,
        plugins: { legend: { display: showLegend } },
        scales: {
            x: { grid: { color: gridColor } },
            y: { grid: { color: gridColor }, beginAtZero: true }
        }
    };
}

DATA.ciCharts.forEach(spec => {
    new Chart(document.getElementById(spec.canvas), {
        type: 'bar',
        data: {
            labels: spec.methods,
            datasets: [{
                label: spec.subject,
                data: spec.means,
                ci: spec.cis,
                backgroundColor: spec.color
            }]
        },
        options: barOptions(false),
        plugins: [ciErrorBars]
    });
});

new Chart(document.getElementById('best-chart'), {
    type: 'bar',
    data: {
        labels: DATA.best.subjects.map((s, i) => s + ' (' + DATA.best.methods[i] + ')'),
        datasets: [{
            label: 'Best mean score',
            data: DATA.best.means,
            backgroundColor: DATA.best.colors
        }]
    },
    options: barOptions(false)
});

new Chart(document.getElementById('overall-chart'), {
    type: 'bar',
    data: {
        labels: DATA.overall.methods,
        datasets: [{
            label: 'Average score',
            data: DATA.overall.means,
            backgroundColor: DATA.overall.colors
        }]
    },
    options: barOptions(false)
});

new Chart(document.getElementById('breakdown-chart'), {
    type: 'bar',
    data: {
        labels: DATA.breakdown.subjects,
        datasets: DATA.breakdown.datasets
    },
    options: barOptions(true)
});"#
}
