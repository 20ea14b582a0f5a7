// SPDX-License-Identifier: PMPL-1.0-or-later
//! Staging of audit input into the shared document root.
//!
//! Input is classified structurally: an element handle, a markup string, or
//! anything else. Elements already in the tree are audited in place; detached
//! elements and markup strings are written into the root, with a [`Restore`]
//! action that puts the root back exactly as it was.

use crate::document::{Document, Element};
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use tracing::debug;

/// Markup must contain at least one tag to be staged
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Document shared between the auditor and restore actions
pub type SharedDocument<D> = Arc<Mutex<D>>;

/// Lock the shared document. A poisoned lock still guards valid markup, so
/// it is recovered rather than propagated.
pub(crate) fn lock<D: Document>(document: &Mutex<D>) -> MutexGuard<'_, D> {
    document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Value handed to the auditor
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlInput {
    /// Node-like value with a tag name
    Element(Element),
    /// Raw markup text
    Markup(String),
    /// Any other value (number, null, list, plain object)
    Other(serde_json::Value),
}

impl From<Element> for HtmlInput {
    fn from(element: Element) -> Self {
        HtmlInput::Element(element)
    }
}

impl From<&str> for HtmlInput {
    fn from(markup: &str) -> Self {
        HtmlInput::Markup(markup.to_string())
    }
}

impl From<String> for HtmlInput {
    fn from(markup: String) -> Self {
        HtmlInput::Markup(markup)
    }
}

impl From<serde_json::Value> for HtmlInput {
    /// Objects with a string `tagName` and a string `outerHTML` are
    /// elements, strings are markup.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(markup) => HtmlInput::Markup(markup),
            serde_json::Value::Object(obj) => {
                let tag_name = obj.get("tagName").and_then(|t| t.as_str());
                let outer_html = obj.get("outerHTML").and_then(|h| h.as_str());
                let element = match (tag_name, outer_html) {
                    (Some(tag_name), Some(outer_html)) => Some(Element::new(tag_name, outer_html)),
                    _ => None,
                };
                match element {
                    Some(element) => HtmlInput::Element(element),
                    None => HtmlInput::Other(serde_json::Value::Object(obj)),
                }
            }
            other => HtmlInput::Other(other),
        }
    }
}

/// How an input will be staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Element already in the document; audited in place
    Attached,
    /// Element outside the document; staged via its outer markup
    Detached,
    /// Markup string containing at least one tag
    Fragment,
    /// String without any tag
    Invalid,
    /// Neither an element nor a string
    Unsupported,
}

/// Whether `markup` contains at least one tag
pub fn has_elements(markup: &str) -> bool {
    TAG_PATTERN.is_match(markup)
}

/// Classify `input` against `document`. Never fails.
pub fn classify(document: &dyn Document, input: &HtmlInput) -> InputKind {
    match input {
        HtmlInput::Element(element) if document.contains(element) => InputKind::Attached,
        HtmlInput::Element(element) if has_elements(&element.outer_html) => InputKind::Detached,
        HtmlInput::Element(_) => InputKind::Invalid,
        HtmlInput::Markup(markup) if has_elements(markup) => InputKind::Fragment,
        HtmlInput::Markup(_) => InputKind::Invalid,
        HtmlInput::Other(_) => InputKind::Unsupported,
    }
}

/// Undo action returned by [`stage`]. Runs at most once.
pub struct Restore {
    action: Option<Box<dyn FnOnce() + Send>>,
}

impl Restore {
    /// Restore that does nothing
    pub fn noop() -> Self {
        Self { action: None }
    }

    pub(crate) fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// Put the document back. Later calls are no-ops.
    pub fn run(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// Whether an undo is still outstanding
    pub fn is_pending(&self) -> bool {
        self.action.is_some()
    }
}

impl std::fmt::Debug for Restore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Restore").field("pending", &self.is_pending()).finish()
    }
}

/// Staged root plus the action that undoes the staging
#[derive(Debug)]
pub struct Mounted {
    pub root: Element,
    pub restore: Restore,
}

/// Stage `input` into the shared document root.
pub fn stage<D>(document: &SharedDocument<D>, input: HtmlInput) -> Result<Mounted>
where
    D: Document + 'static,
{
    let mut doc = lock(document);

    let markup = match (classify(&*doc, &input), input) {
        (InputKind::Attached, HtmlInput::Element(element)) => {
            debug!("Auditing attached <{}> in place", element.tag_name.to_lowercase());
            return Ok(Mounted {
                root: element,
                restore: Restore::noop(),
            });
        }
        (InputKind::Detached, HtmlInput::Element(element)) => element.outer_html,
        (InputKind::Fragment, HtmlInput::Markup(markup)) => markup,
        (InputKind::Invalid, HtmlInput::Element(element)) => {
            return Err(Error::InvalidInput(element.outer_html))
        }
        (InputKind::Invalid, HtmlInput::Markup(markup)) => return Err(Error::InvalidInput(markup)),
        _ => return Err(Error::UnsupportedInput),
    };

    let original = doc.inner_html();
    doc.set_inner_html(&markup);
    debug!("Staged {} bytes into document root", markup.len());

    let shared = Arc::clone(document);
    let restore = Restore::new(move || {
        lock(&shared).set_inner_html(&original);
        debug!("Restored document root");
    });

    Ok(Mounted {
        root: doc.body(),
        restore,
    })
}
