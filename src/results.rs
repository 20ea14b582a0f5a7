// SPDX-License-Identifier: PMPL-1.0-or-later
//! Audit engine result types.
//!
//! These mirror the JSON document an axe-style engine hands back from a run,
//! so saved result files and live engine output deserialize into the same
//! structs. Only `violations` is interpreted by the matcher; the remaining
//! fields are carried through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Impact level reported for a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Minor => write!(f, "minor"),
            Impact::Moderate => write!(f, "moderate"),
            Impact::Serious => write!(f, "serious"),
            Impact::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Impact::Minor),
            "moderate" => Ok(Impact::Moderate),
            "serious" => Ok(Impact::Serious),
            "critical" => Ok(Impact::Critical),
            other => Err(format!("Unknown impact level: {}", other)),
        }
    }
}

/// One DOM location where a rule failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResult {
    /// Selector path to the node, outermost frame first
    #[serde(default)]
    pub target: Vec<String>,
    /// Serialized markup of the node
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
}

impl NodeResult {
    pub fn new(target: &[&str], html: &str) -> Self {
        Self {
            target: target.iter().map(|s| s.to_string()).collect(),
            html: html.to_string(),
            ..Self::default()
        }
    }

    pub fn with_failure_summary(mut self, summary: &str) -> Self {
        self.failure_summary = Some(summary.to_string());
        self
    }

    /// Selector path joined the way the report prints it
    pub fn selector(&self) -> String {
        self.target.join(", ")
    }
}

/// A single rule failure covering one or more nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeResult>,
}

impl Violation {
    pub fn new(id: &str, impact: Impact, help: &str) -> Self {
        Self {
            id: id.to_string(),
            impact: Some(impact),
            help: help.to_string(),
            ..Self::default()
        }
    }

    pub fn with_help_url(mut self, url: &str) -> Self {
        self.help_url = Some(url.to_string());
        self
    }

    pub fn with_node(mut self, node: NodeResult) -> Self {
        self.nodes.push(node);
        self
    }
}

/// Options the engine ran with, echoed back in the result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_levels: Option<Vec<Impact>>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Engine name and version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestEngine {
    pub name: String,
    pub version: String,
}

/// Raw result document produced by one engine run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResults {
    /// Absent when the engine was configured with a non-default reporter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_options: Option<ToolOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_engine: Option<TestEngine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passes: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incomplete: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inapplicable: Vec<serde_json::Value>,
}

impl AuditResults {
    /// Well-formed result carrying the given violations
    pub fn with_violations(violations: Vec<Violation>) -> Self {
        Self {
            violations: Some(violations),
            ..Self::default()
        }
    }

    /// Impact filter requested by the run, empty when none was set
    pub fn impact_levels(&self) -> &[Impact] {
        self.tool_options
            .as_ref()
            .and_then(|o| o.impact_levels.as_deref())
            .unwrap_or(&[])
    }
}
