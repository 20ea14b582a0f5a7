// SPDX-License-Identifier: PMPL-1.0-or-later
//! Violation filtering and failure message rendering.

use super::palette::Palette;
use crate::results::{Impact, NodeResult, Violation};
use std::borrow::Cow;

const LINE_BREAK: &str = "\n\n";
const HORIZONTAL_LINE: &str = "\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}";

/// Keep violations whose impact is in `levels`, in engine order.
///
/// An empty `levels` keeps everything and borrows the input as is.
/// Violations without an impact never match a non-empty filter.
pub fn filter_violations<'a>(
    violations: &'a [Violation],
    levels: &[Impact],
) -> Cow<'a, [Violation]> {
    if levels.is_empty() {
        return Cow::Borrowed(violations);
    }

    Cow::Owned(
        violations
            .iter()
            .filter(|v| v.impact.is_some_and(|impact| levels.contains(&impact)))
            .cloned()
            .collect(),
    )
}

fn format_node(violation: &Violation, node: &NodeResult, palette: Palette) -> String {
    let mut block = format!(
        "Expected the HTML found at $('{}') to have no violations:{LINE_BREAK}",
        node.selector()
    );
    block.push_str(&palette.grey(&node.html));
    block.push_str(LINE_BREAK);
    block.push_str("Received:");
    block.push_str(LINE_BREAK);
    block.push_str(&palette.white(&format!("{} ({})", violation.help, violation.id)));
    block.push_str(LINE_BREAK);
    block.push_str(&palette.yellow(node.failure_summary.as_deref().unwrap_or("")));
    block.push_str(LINE_BREAK);

    if let Some(url) = violation.help_url.as_deref().filter(|u| !u.is_empty()) {
        block.push_str("You can find more information on this issue here: \n");
        block.push_str(&palette.blue(url));
    }

    block
}

/// Render violations as the matcher's failure report. Empty input renders
/// as an empty string.
pub fn format_violations(violations: &[Violation], palette: Palette) -> String {
    let separator = format!("{LINE_BREAK}{HORIZONTAL_LINE}{LINE_BREAK}");

    violations
        .iter()
        .map(|violation| {
            violation
                .nodes
                .iter()
                .map(|node| format_node(violation, node, palette))
                .collect::<Vec<_>>()
                .join(LINE_BREAK)
        })
        .collect::<Vec<_>>()
        .join(&separator)
}
