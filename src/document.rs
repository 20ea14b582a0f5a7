// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document runtime boundary.
//!
//! The audit stages markup into a single shared root (the document body).
//! [`Document`] is the slice of a DOM runtime the mount protocol needs;
//! [`MemoryDocument`] is a string-backed implementation for tests and for
//! replaying saved engine results.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Handle to an element, identified by node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub tag_name: String,
    #[serde(rename = "outerHTML")]
    pub outer_html: String,
}

impl Element {
    /// Create a new element that no document knows about yet
    pub fn new(tag_name: &str, outer_html: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag_name: tag_name.to_uppercase(),
            outer_html: outer_html.to_string(),
        }
    }
}

/// Trait implemented by document runtimes
pub trait Document: Send {
    /// The shared root that staged markup is written into
    fn body(&self) -> Element;

    /// Current markup of the root's children
    fn inner_html(&self) -> String;

    /// Replace the root's children with `html`
    fn set_inner_html(&mut self, html: &str);

    /// Whether `element` is part of this document's tree
    fn contains(&self, element: &Element) -> bool;

    /// Compatibility shim for runtimes whose new nodes report themselves as
    /// connected before insertion. Must be safe to call repeatedly.
    fn prepare_environment(&mut self) {}
}

/// String-backed document with a single body root
#[derive(Debug)]
pub struct MemoryDocument {
    body_id: Uuid,
    inner_html: String,
    attached: HashSet<Uuid>,
    nodes_disconnected_by_default: bool,
}

impl MemoryDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::with_body("")
    }

    /// Create a document whose body already holds `html`
    pub fn with_body(html: &str) -> Self {
        Self {
            body_id: Uuid::new_v4(),
            inner_html: html.to_string(),
            attached: HashSet::new(),
            nodes_disconnected_by_default: false,
        }
    }

    /// Append `element` to the body, attaching it to the tree
    pub fn append(&mut self, element: &Element) {
        self.inner_html.push_str(&element.outer_html);
        self.attached.insert(element.id);
    }

    /// Whether [`Document::prepare_environment`] has run
    pub fn environment_prepared(&self) -> bool {
        self.nodes_disconnected_by_default
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> Element {
        Element {
            id: self.body_id,
            tag_name: "BODY".to_string(),
            outer_html: format!("<body>{}</body>", self.inner_html),
        }
    }

    fn inner_html(&self) -> String {
        self.inner_html.clone()
    }

    fn set_inner_html(&mut self, html: &str) {
        // Replacing the children drops every previously attached node.
        self.attached.clear();
        self.inner_html = html.to_string();
    }

    fn contains(&self, element: &Element) -> bool {
        element.id == self.body_id || self.attached.contains(&element.id)
    }

    fn prepare_environment(&mut self) {
        self.nodes_disconnected_by_default = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_attaches() {
        let mut doc = MemoryDocument::with_body("<main></main>");
        let button = Element::new("button", "<button>Go</button>");
        assert!(!doc.contains(&button));

        doc.append(&button);
        assert!(doc.contains(&button));
        assert_eq!(doc.inner_html(), "<main></main><button>Go</button>");
    }

    #[test]
    fn test_set_inner_html_detaches_children() {
        let mut doc = MemoryDocument::new();
        let link = Element::new("a", "<a href=\"/\">Home</a>");
        doc.append(&link);

        doc.set_inner_html("<p>replaced</p>");
        assert!(!doc.contains(&link));
        assert!(doc.contains(&doc.body()));
    }

    #[test]
    fn test_prepare_environment_idempotent() {
        let mut doc = MemoryDocument::new();
        doc.prepare_environment();
        doc.prepare_environment();
        assert!(doc.environment_prepared());
        assert_eq!(doc.inner_html(), "");
    }

    #[test]
    fn test_element_from_json() {
        let el: Element =
            serde_json::from_value(serde_json::json!({ "tagName": "IMG", "outerHTML": "<img>" }))
                .unwrap();
        assert_eq!(el.tag_name, "IMG");
        assert_eq!(el.outer_html, "<img>");
    }
}
