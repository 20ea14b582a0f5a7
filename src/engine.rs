// SPDX-License-Identifier: PMPL-1.0-or-later
//! Audit engine boundary.
//!
//! Engines are callback driven: [`AuditEngine::run`] receives a
//! [`Completion`] and reports through it exactly once, from any thread and
//! at any later time. The completion owns the restore action for the staged
//! document, so the document is back in its original state before the
//! waiting auditor observes the outcome.

use crate::document::Element;
use crate::error::{EngineError, Error, Result};
use crate::mount::Restore;
use crate::results::{AuditResults, Impact, ToolOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Enable or disable a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleToggle {
    pub enabled: bool,
}

/// Options passed through to the engine. Empty unless configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// Impact levels the matcher should report on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_levels: Option<Vec<Impact>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleToggle>,
    /// Restrict the run to rules carrying these tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_only: Option<Vec<String>>,
}

impl RunOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_impact_levels(mut self, levels: &[Impact]) -> Self {
        self.impact_levels = Some(levels.to_vec());
        self
    }

    pub fn with_rule(mut self, rule_id: &str, enabled: bool) -> Self {
        self.rules.insert(rule_id.to_string(), RuleToggle { enabled });
        self
    }

    /// Fold these options into a result's `toolOptions`, the way engines
    /// echo the options they ran with.
    pub fn echo_into(&self, results: &mut AuditResults) {
        if self.is_empty() {
            return;
        }
        let tool_options = results.tool_options.get_or_insert_with(ToolOptions::default);
        if let Some(levels) = &self.impact_levels {
            tool_options.impact_levels = Some(levels.clone());
        }
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(self) {
            for (key, value) in map {
                if key != "impactLevels" {
                    tool_options.other.insert(key, value);
                }
            }
        }
    }
}

/// Single-use completion handle given to an engine run.
///
/// Dropping it without calling [`Completion::complete`] still restores the
/// document and settles the audit with [`Error::EngineAbandoned`].
pub struct Completion {
    restore: Restore,
    sender: Option<oneshot::Sender<Result<AuditResults>>>,
}

impl Completion {
    pub(crate) fn new(restore: Restore, sender: oneshot::Sender<Result<AuditResults>>) -> Self {
        Self {
            restore,
            sender: Some(sender),
        }
    }

    /// Report the engine outcome. Restores the document, then settles.
    pub fn complete(mut self, outcome: std::result::Result<AuditResults, EngineError>) {
        self.restore.run();
        if let Some(sender) = self.sender.take() {
            match &outcome {
                Ok(_) => debug!("Audit engine completed"),
                Err(e) => debug!("Audit engine failed: {}", e),
            }
            // The auditor may have stopped waiting; nothing left to notify.
            let _ = sender.send(outcome.map_err(Error::from));
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            warn!("Audit engine dropped its completion without reporting");
            self.restore.run();
            let _ = sender.send(Err(Error::EngineAbandoned));
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("settled", &self.sender.is_none())
            .finish()
    }
}

/// Trait implemented by accessibility audit engines
pub trait AuditEngine: Send + Sync {
    /// Prepare internal state against the document root
    fn setup(&self, root: &Element);

    /// Audit `context` and report through `done`
    fn run(&self, context: Element, options: &RunOptions, done: Completion);
}

/// What a [`ReplayEngine`] answers with
#[derive(Debug, Clone)]
pub enum Reply {
    Results(AuditResults),
    Fail(EngineError),
    /// Drop the completion without reporting
    Abandon,
}

/// Engine that answers every run with a prerecorded reply.
///
/// Used to re-judge saved result files and in tests. It inspects nothing;
/// the contexts it was run against are kept for inspection.
#[derive(Debug)]
pub struct ReplayEngine {
    reply: Reply,
    setups: Mutex<Vec<Element>>,
    contexts: Mutex<Vec<Element>>,
}

impl ReplayEngine {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            setups: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn replaying(results: AuditResults) -> Self {
        Self::new(Reply::Results(results))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Reply::Fail(EngineError::new(message)))
    }

    /// Roots passed to [`AuditEngine::setup`], in call order
    pub fn setups(&self) -> Vec<Element> {
        self.setups.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Contexts the engine was run against, in call order
    pub fn contexts(&self) -> Vec<Element> {
        self.contexts.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl AuditEngine for ReplayEngine {
    fn setup(&self, root: &Element) {
        if let Ok(mut setups) = self.setups.lock() {
            setups.push(root.clone());
        }
    }

    fn run(&self, context: Element, options: &RunOptions, done: Completion) {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(context);
        }

        match &self.reply {
            Reply::Results(results) => {
                let mut results = results.clone();
                options.echo_into(&mut results);
                done.complete(Ok(results));
            }
            Reply::Fail(error) => done.complete(Err(error.clone())),
            Reply::Abandon => drop(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_restore(count: &Arc<AtomicUsize>) -> Restore {
        let count = Arc::clone(count);
        Restore::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_complete_restores_then_settles() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = oneshot::channel();
        let completion = Completion::new(counting_restore(&count), tx);

        completion.complete(Ok(AuditResults::with_violations(vec![])));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().unwrap().is_ok());
    }

    #[test]
    fn test_failure_settles_once_with_engine_error() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = oneshot::channel();
        let completion = Completion::new(counting_restore(&count), tx);

        completion.complete(Err(EngineError::new("boom")));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        let err = rx.try_recv().unwrap().unwrap_err();
        assert!(matches!(err, Error::Engine(ref e) if e.message() == "boom"));
    }

    #[test]
    fn test_drop_restores_and_reports_abandoned() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = oneshot::channel();
        drop(Completion::new(counting_restore(&count), tx));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(matches!(rx.try_recv().unwrap(), Err(Error::EngineAbandoned)));
    }

    #[test]
    fn test_echo_into_tool_options() {
        let options = RunOptions::default()
            .with_impact_levels(&[Impact::Serious, Impact::Critical])
            .with_rule("color-contrast", false);
        let mut results = AuditResults::with_violations(vec![]);
        options.echo_into(&mut results);

        assert_eq!(results.impact_levels(), &[Impact::Serious, Impact::Critical]);
        let tool_options = results.tool_options.unwrap();
        assert_eq!(tool_options.other["rules"]["color-contrast"]["enabled"], false);
        assert!(!tool_options.other.contains_key("impactLevels"));
    }

    #[test]
    fn test_empty_options_leave_results_alone() {
        let mut results = AuditResults::with_violations(vec![]);
        RunOptions::default().echo_into(&mut results);
        assert!(results.tool_options.is_none());
        assert_eq!(serde_json::to_string(&RunOptions::default()).unwrap(), "{}");
    }
}
