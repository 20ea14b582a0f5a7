// SPDX-License-Identifier: PMPL-1.0-or-later
//! The `toHaveNoViolations` matcher.
//!
//! Test runners with custom matchers consume [`MatcherResult`] directly;
//! plain Rust tests use [`assert_no_violations`].

use crate::error::{Error, Result};
use crate::report::{filter_violations, format_violations, Palette};
use crate::results::{AuditResults, Violation};

/// Name the matcher is registered under
pub const MATCHER_NAME: &str = "toHaveNoViolations";

type MessageFn = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Outcome of the matcher, in the usual custom-matcher shape
pub struct MatcherResult {
    /// Violations left after impact filtering
    pub actual: Vec<Violation>,
    pub pass: bool,
    message: MessageFn,
}

impl MatcherResult {
    /// Failure message, `None` when the matcher passed
    pub fn message(&self) -> Option<String> {
        (self.message)()
    }
}

impl std::fmt::Debug for MatcherResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherResult")
            .field("actual", &self.actual)
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

/// Judge `results` with ANSI-decorated messages
pub fn to_have_no_violations(results: &AuditResults) -> Result<MatcherResult> {
    to_have_no_violations_with(results, Palette::Ansi)
}

/// Judge `results`, decorating the failure message with `palette`.
///
/// Only violations whose impact is listed in `toolOptions.impactLevels`
/// count; with no levels listed every violation counts.
pub fn to_have_no_violations_with(
    results: &AuditResults,
    palette: Palette,
) -> Result<MatcherResult> {
    let violations = results.violations.as_deref().ok_or(Error::MalformedResult)?;

    let actual = filter_violations(violations, results.impact_levels()).into_owned();
    let formatted = format_violations(&actual, palette);
    let pass = formatted.is_empty();

    let message: MessageFn = Box::new(move || {
        if pass {
            return None;
        }
        Some(format!("{}\n\n{}", palette.red(&format!(".{}", MATCHER_NAME)), formatted))
    });

    Ok(MatcherResult { actual, pass, message })
}

/// Panic with the matcher's failure message unless `results` pass.
///
/// # Panics
///
/// When the result is malformed or contains matching violations.
#[track_caller]
pub fn assert_no_violations(results: &AuditResults) {
    match to_have_no_violations(results) {
        Ok(outcome) => {
            if let Some(message) = outcome.message() {
                panic!("{}", message);
            }
        }
        Err(e) => panic!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Impact, NodeResult, ToolOptions};

    fn result_with(violations: Vec<Violation>, levels: Option<Vec<Impact>>) -> AuditResults {
        AuditResults {
            violations: Some(violations),
            tool_options: levels.map(|l| ToolOptions {
                impact_levels: Some(l),
                ..ToolOptions::default()
            }),
            ..AuditResults::default()
        }
    }

    fn contrast() -> Violation {
        Violation::new(
            "color-contrast",
            Impact::Serious,
            "Elements must have sufficient color contrast",
        )
        .with_node(NodeResult::new(&[".muted"], "<p class=\"muted\">fine print</p>"))
    }

    #[test]
    fn test_pass_has_no_message() {
        let outcome = to_have_no_violations(&result_with(vec![], None)).unwrap();
        assert!(outcome.pass);
        assert!(outcome.actual.is_empty());
        assert_eq!(outcome.message(), None);
    }

    #[test]
    fn test_fail_message_has_header_and_report() {
        let outcome =
            to_have_no_violations_with(&result_with(vec![contrast()], None), Palette::Plain)
                .unwrap();
        assert!(!outcome.pass);
        let message = outcome.message().unwrap();
        assert!(message
            .starts_with(".toHaveNoViolations\n\nExpected the HTML found at $('.muted')"));
        assert!(message.contains("(color-contrast)"));
    }

    #[test]
    fn test_impact_levels_filter_out_everything() {
        let results = result_with(vec![contrast()], Some(vec![Impact::Critical]));
        let outcome = to_have_no_violations(&results).unwrap();
        assert!(outcome.pass);
        assert!(outcome.actual.is_empty());
        assert_eq!(outcome.message(), None);
    }

    #[test]
    fn test_impact_levels_keep_matching() {
        let results = result_with(vec![contrast()], Some(vec![Impact::Serious]));
        let outcome = to_have_no_violations(&results).unwrap();
        assert!(!outcome.pass);
        assert_eq!(outcome.actual.len(), 1);
    }

    #[test]
    fn test_pass_is_palette_independent() {
        let results = result_with(vec![contrast()], None);
        for palette in [Palette::Plain, Palette::Ansi] {
            assert!(!to_have_no_violations_with(&results, palette).unwrap().pass);
        }
    }

    #[test]
    fn test_missing_violations_is_malformed() {
        let err = to_have_no_violations(&AuditResults::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedResult));
        assert!(err.to_string().contains("No violations property found"));
    }

    #[test]
    fn test_violation_without_nodes_renders_nothing() {
        let bare = Violation::new("document-title", Impact::Serious, "Documents must have a title");
        let outcome = to_have_no_violations(&result_with(vec![bare], None)).unwrap();
        assert_eq!(outcome.actual.len(), 1);
        assert!(outcome.pass);
    }

    #[test]
    fn test_assert_no_violations_passes() {
        assert_no_violations(&result_with(vec![], None));
    }

    #[test]
    #[should_panic(expected = "color-contrast")]
    fn test_assert_no_violations_panics_with_report() {
        assert_no_violations(&result_with(vec![contrast()], None));
    }

    #[test]
    #[should_panic(expected = "No violations property found")]
    fn test_assert_no_violations_panics_on_malformed() {
        assert_no_violations(&AuditResults::default());
    }
}
