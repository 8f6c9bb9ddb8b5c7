//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.teachdash.toml` files. Chart styling (color maps, theme) lives here
//! as explicit configuration data rather than module-level globals.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Fallback color for subjects or methods without a configured entry.
pub const FALLBACK_COLOR: &str = "#CCCCCC";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Chart styling settings.
    #[serde(default)]
    pub style: StyleConfig,

    /// MANOVA display settings.
    #[serde(default)]
    pub manova: ManovaConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "teachdash_dashboard.html".to_string()
}

/// Input dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Worksheet name to read from workbooks.
    #[serde(default = "default_sheet")]
    pub sheet: String,

    /// Decimal places for rounded table output.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            decimals: default_decimals(),
        }
    }
}

fn default_sheet() -> String {
    "Sheet1".to_string()
}

fn default_decimals() -> usize {
    2
}

/// Chart styling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Page theme: "dark" or "light".
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Bar color per subject.
    #[serde(default = "default_subject_colors")]
    pub subject_colors: BTreeMap<String, String>,

    /// Bar color per teaching method.
    #[serde(default = "default_method_colors")]
    pub method_colors: BTreeMap<String, String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            subject_colors: default_subject_colors(),
            method_colors: default_method_colors(),
        }
    }
}

impl StyleConfig {
    /// Color for a subject, falling back to a neutral grey.
    pub fn subject_color(&self, subject: &str) -> &str {
        self.subject_colors
            .get(subject)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Color for a teaching method, falling back to a neutral grey.
    pub fn method_color(&self, method: &str) -> &str {
        self.method_colors
            .get(method)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_subject_colors() -> BTreeMap<String, String> {
    [
        ("English", "#A3C4BC"),
        ("Math", "#6B9080"),
        ("Chemistry", "#CCE3DC"),
        ("Physics", "#D5C6E0"),
        ("Biology", "#A4C3B2"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_method_colors() -> BTreeMap<String, String> {
    [
        ("Lecture-Based Instruction", "#7E8D85"),
        ("Facilitator", "#C1DADB"),
        ("Technology Based Learning", "#87BBA2"),
        ("Group Learning", "#BFD8B8"),
        ("Individual Learning", "#E4EFE7"),
        ("Inquiry-Based Learning", "#96C9DC"),
        ("Differentiated Instruction", "#A69CAC"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// MANOVA display settings.
///
/// The p-value shown on the dashboard is an injected constant supplied by
/// an external analysis; this tool never computes it from the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManovaConfig {
    /// Pre-computed p-value to display.
    #[serde(default = "default_p_value")]
    pub p_value: f64,

    /// Significance threshold for the decision zone.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for ManovaConfig {
    fn default() -> Self {
        Self {
            p_value: default_p_value(),
            alpha: default_alpha(),
        }
    }
}

fn default_p_value() -> f64 {
    2.2e-16
}

fn default_alpha() -> f64 {
    0.05
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".teachdash.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref sheet) = args.sheet {
            self.dataset.sheet = sheet.clone();
        }

        if let Some(decimals) = args.decimals {
            self.dataset.decimals = decimals;
        }

        if let Some(ref theme) = args.theme {
            self.style.theme = theme.clone();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
