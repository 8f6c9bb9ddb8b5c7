//! TeachDash - Teaching Method Effectiveness Dashboard
//!
//! A CLI tool that loads a spreadsheet of student scores by teaching
//! method, computes descriptive statistics per (method, subject) pair,
//! and renders an HTML dashboard or a Markdown/JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing file, schema error, config failure, etc.)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{DashboardReport, LongRecord, ReportMetadata};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("TeachDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Build the dashboard
    match run_dashboard(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard generation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .teachdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".teachdash.toml");

    if path.exists() {
        eprintln!("⚠️  .teachdash.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .teachdash.toml")?;

    println!("✅ Created .teachdash.toml with default settings.");
    println!("   Edit it to customize sheet name, colors, theme, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete dashboard workflow. Returns the exit code.
fn run_dashboard(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = match args.input.clone() {
        Some(path) => path,
        None => anyhow::bail!("An input file is required (use --input)"),
    };

    // Step 1: Load and validate the spreadsheet
    println!("📥 Loading spreadsheet: {}", input.display());
    let records = dataset::load_records(&input, &config.dataset.sheet)?;
    info!("Loaded {} student records", records.len());

    if records.is_empty() {
        warn!("Input contains no data rows");
    }

    // Step 2: Reshape and aggregate
    let long = analysis::melt(&records);
    let summary = analysis::aggregate_long(&long);
    let subject_order = analysis::subjects_in_order(&long);
    let best_by_subject = analysis::best_method_per_subject(&summary, &subject_order);
    let overall_means = analysis::overall_mean_per_method(&long);

    debug!(
        "Aggregated {} observations into {} partitions",
        long.len(),
        summary.len()
    );

    // Handle --dry-run: report the dataset shape and exit
    if args.dry_run {
        return handle_dry_run(records.len(), &long, &subject_order);
    }

    let duration = start_time.elapsed().as_secs_f64();

    // Step 3: Assemble the report model
    let metadata = ReportMetadata {
        source_file: input.display().to_string(),
        generated_at: Utc::now(),
        students: records.len(),
        observations: long.len(),
        methods: overall_means.len(),
        subjects: subject_order.len(),
        duration_seconds: duration,
    };

    let report_model = DashboardReport {
        metadata,
        summary,
        best_by_subject,
        overall_means,
        subject_order,
        manova_p_value: config.manova.p_value,
        alpha: config.manova.alpha,
    };

    // Step 4: Render and save
    println!("📝 Generating {:?} output...", args.format);

    let decimals = config.dataset.decimals;
    let output = match args.format {
        OutputFormat::Html => {
            report::generate_html_dashboard(&report_model, &config.style, decimals)
        }
        OutputFormat::Markdown => report::generate_markdown_report(&report_model, decimals),
        OutputFormat::Json => report::generate_json_report(&report_model)?,
    };

    let output_path = PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write output to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Dashboard Summary:");
    println!("   Students: {}", report_model.metadata.students);
    println!("   Observations: {}", report_model.metadata.observations);
    println!(
        "   Partitions: {} ({} methods × {} subjects present)",
        report_model.summary.len(),
        report_model.metadata.methods,
        report_model.metadata.subjects
    );
    println!("   Duration: {:.2}s", duration);
    println!(
        "\n✅ Done! Output saved to: {}",
        output_path.display()
    );

    Ok(0)
}

/// Handle --dry-run: print the dataset shape, write nothing.
fn handle_dry_run(students: usize, long: &[LongRecord], subjects: &[String]) -> Result<i32> {
    println!("\n🔍 Dry run: dataset loaded and validated (no output written)\n");

    let mut methods: Vec<&str> = Vec::new();
    for record in long {
        if !methods.contains(&record.teaching_method.as_str()) {
            methods.push(&record.teaching_method);
        }
    }

    println!("   Students: {}", students);
    println!("   Observations: {}", long.len());
    println!("   Subjects ({}): {}", subjects.len(), subjects.join(", "));
    println!("   Methods ({}):", methods.len());
    for method in methods {
        println!("     📄 {}", method);
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .teachdash.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
