// SPDX-License-Identifier: PMPL-1.0-or-later
//! Re-judging of saved engine result files.
//!
//! Walks directory trees for `*.json` result documents and runs each through
//! the matcher, so audits recorded elsewhere can gate a build.

use crate::config::Config;
use crate::error::Result;
use crate::matcher::to_have_no_violations_with;
use crate::report::Palette;
use crate::results::{AuditResults, ToolOptions, Violation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions to scan
const RESULT_EXTENSIONS: &[&str] = &["json"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "target",
    "dist",
    "build",
    "vendor",
    "coverage",
];

/// Verdict for one result file
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub path: PathBuf,
    pub pass: bool,
    /// Violations that counted against the file
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set when the file could not be judged at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Verdicts for every file in a scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub outcomes: Vec<ScanOutcome>,
}

impl ScanSummary {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.pass).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.passed()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.pass)
    }
}

/// Apply configured impact levels to a result that names none
fn apply_config(results: &mut AuditResults, config: &Config) {
    if !results.impact_levels().is_empty() {
        return;
    }
    if let Some(levels) = config.effective_run_options().impact_levels {
        results
            .tool_options
            .get_or_insert_with(ToolOptions::default)
            .impact_levels = Some(levels);
    }
}

/// Judge a single saved result file
pub fn scan_file(path: &Path, config: &Config, palette: Palette) -> Result<ScanOutcome> {
    let content = std::fs::read_to_string(path)?;
    let mut results: AuditResults = serde_json::from_str(&content)?;
    apply_config(&mut results, config);

    let outcome = to_have_no_violations_with(&results, palette)?;
    debug!("{}: {} violation(s) counted", path.display(), outcome.actual.len());

    Ok(ScanOutcome {
        path: path.to_path_buf(),
        pass: outcome.pass,
        message: outcome.message(),
        violations: outcome.actual,
        error: None,
    })
}

/// Judge every result file under `dir`. Files that cannot be judged are
/// recorded as failures rather than skipped.
pub fn scan_directory(dir: &Path, config: &Config, palette: Palette) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            if e.depth() > 0 && e.file_type().is_dir() {
                return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !RESULT_EXTENSIONS.contains(&ext) {
            continue;
        }

        let outcome = scan_file(path, config, palette).unwrap_or_else(|e| {
            warn!("Could not judge {}: {}", path.display(), e);
            ScanOutcome {
                path: path.to_path_buf(),
                pass: false,
                violations: Vec::new(),
                message: None,
                error: Some(e.to_string()),
            }
        });
        summary.outcomes.push(outcome);
    }

    info!(
        "Judged {} result file(s), {} failing",
        summary.len(),
        summary.failed()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Impact;

    const FAILING: &str = r#"{
        "violations": [{
            "id": "region",
            "impact": "moderate",
            "help": "All content should be contained by landmarks",
            "nodes": [{ "target": ["div"], "html": "<div>x</div>" }]
        }]
    }"#;

    #[test]
    fn test_scan_nonexistent_dir() {
        let summary =
            scan_directory(Path::new("/nonexistent/path"), &Config::default(), Palette::Plain)
                .unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_config_levels_apply_when_result_has_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, FAILING).unwrap();

        let strict = scan_file(&path, &Config::default(), Palette::Plain).unwrap();
        assert!(!strict.pass);

        let config = Config {
            impact_levels: vec![Impact::Critical],
            ..Config::default()
        };
        let lenient = scan_file(&path, &config, Palette::Plain).unwrap();
        assert!(lenient.pass);
        assert!(lenient.message.is_none());
    }

    #[test]
    fn test_directory_skips_hidden_and_records_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), FAILING).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{ "url": "http://localhost" }"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        std::fs::write(dir.path().join("node_modules").join("c.json"), FAILING).unwrap();

        let summary = scan_directory(dir.path(), &Config::default(), Palette::Plain).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.failed(), 2);
        let malformed = &summary.outcomes[1];
        assert!(malformed.error.as_deref().unwrap().contains("No violations property found"));
    }
}
