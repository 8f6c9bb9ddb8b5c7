//! Report and dashboard rendering.

pub mod dashboard;
pub mod generator;

pub use dashboard::generate_html_dashboard;
pub use generator::{generate_json_report, generate_markdown_report};
