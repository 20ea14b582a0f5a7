// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for audit results.
//!
//! The matcher's failure message is rendered by [`format_violations`].
//! Whole scans of saved result files render through [`generate_report`]:
//! - Text: the failure messages of every failing file
//! - JSON: the scan summary for programmatic consumption

mod palette;
mod violations;

pub use palette::Palette;
pub use violations::{filter_violations, format_violations};

use crate::scanner::ScanSummary;

/// Output format for scan reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Generate a report from a scan
pub fn generate_report(summary: &ScanSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(summary),
        OutputFormat::Json => generate_json_report(summary),
    }
}

fn generate_text_report(summary: &ScanSummary) -> String {
    let mut output = String::new();

    output.push_str("=== axe-assert Report ===\n\n");

    if summary.is_empty() {
        output.push_str("No audit result files found.\n");
        return output;
    }

    output.push_str(&format!(
        "Checked {} result file(s): {} passed, {} failed\n\n",
        summary.len(),
        summary.passed(),
        summary.failed()
    ));

    for outcome in summary.outcomes.iter().filter(|o| !o.pass) {
        output.push_str(&format!("--- {} ---\n", outcome.path.display()));
        if let Some(ref error) = outcome.error {
            output.push_str(&format!("Error: {}\n", error));
        }
        if let Some(ref message) = outcome.message {
            output.push_str(message);
            output.push('\n');
        }
        output.push('\n');
    }

    if summary.has_failures() {
        output.push_str("RESULT: FAIL\n");
    } else {
        output.push_str("RESULT: PASS\n");
    }

    output
}

fn generate_json_report(summary: &ScanSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize scan summary: {}\"}}", e)
    })
}
