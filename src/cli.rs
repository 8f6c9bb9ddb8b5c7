//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// TeachDash - teaching-method effectiveness dashboard generator
///
/// Load a spreadsheet of student scores by teaching method, compute
/// descriptive statistics per (method, subject) pair, and render an HTML
/// dashboard or a Markdown/JSON report.
///
/// Examples:
///   teachdash --input teaching_data.xlsx
///   teachdash --input teaching_data.xlsx --sheet Scores --format markdown
///   teachdash --input scores.csv --output report.json --format json
///   teachdash --input teaching_data.xlsx --dry-run
///   teachdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input spreadsheet to analyze (.xlsx or .csv)
    ///
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TEACHDASH_INPUT",
        required_unless_present = "init_config"
    )]
    pub input: Option<PathBuf>,

    /// Worksheet name to read from a workbook
    ///
    /// Ignored for CSV input. Defaults to "Sheet1" or the config value.
    #[arg(short, long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Output file path for the dashboard or report
    ///
    /// Defaults to teachdash_dashboard.html or the config value.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (html, markdown, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .teachdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Decimal places for rounded statistics in tables
    #[arg(long, value_name = "N")]
    pub decimals: Option<usize>,

    /// Page theme for the HTML dashboard (dark, light)
    #[arg(long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and validate the dataset, print its shape, and exit
    ///
    /// No report is written.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .teachdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML dashboard (default)
    #[default]
    Html,
    /// Markdown report
    Markdown,
    /// JSON report
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.input.is_none() {
            return Err("An input file is required (use --input)".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(decimals) = self.decimals {
            if decimals > 10 {
                return Err("Decimals must be between 0 and 10".to_string());
            }
        }

        if let Some(ref theme) = self.theme {
            if theme != "dark" && theme != "light" {
                return Err(format!("Unknown theme '{}' (expected dark or light)", theme));
            }
        }

        if let Some(ref sheet) = self.sheet {
            if sheet.trim().is_empty() {
                return Err("Sheet name cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("teaching_data.xlsx")),
            sheet: None,
            output: None,
            format: OutputFormat::Html,
            config: None,
            decimals: None,
            theme: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_requires_input() {
        let mut args = make_args();
        args.input = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_theme() {
        let mut args = make_args();
        args.theme = Some("dark".to_string());
        assert!(args.validate().is_ok());

        args.theme = Some("sepia".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_decimals_range() {
        let mut args = make_args();
        args.decimals = Some(2);
        assert!(args.validate().is_ok());

        args.decimals = Some(11);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
