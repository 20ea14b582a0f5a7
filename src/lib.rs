// SPDX-License-Identifier: PMPL-1.0-or-later
//! axe-assert - accessibility audits as test assertions
//!
//! Stages HTML into a document, runs an axe-style audit engine against it,
//! and judges the result with the `toHaveNoViolations` matcher.
//!
//! ## Flow
//!
//! - **Mount** ([`mount`]): classify the input and stage it into the single
//!   document root, keeping an action that restores the root
//! - **Audit** ([`auditor`]): run the engine on the staged root; the root is
//!   restored before the outcome is observable
//! - **Judge** ([`matcher`], [`report`]): filter violations by impact level
//!   and render a deterministic failure report
//!
//! ```rust,ignore
//! use axe_assert::{Auditor, MemoryDocument, matcher::assert_no_violations};
//!
//! let auditor = Auditor::new(engine, Arc::new(Mutex::new(MemoryDocument::new())));
//! let results = auditor.audit("<img src=\"logo.png\">").await?;
//! assert_no_violations(&results);
//! ```

pub mod auditor;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod mount;
pub mod report;
pub mod results;
pub mod scanner;

pub use auditor::Auditor;
pub use config::{load_config, ColorChoice, Config};
pub use document::{Document, Element, MemoryDocument};
pub use engine::{AuditEngine, Completion, ReplayEngine, Reply, RunOptions};
pub use error::{EngineError, Error, Result};
pub use matcher::{assert_no_violations, to_have_no_violations, MatcherResult, MATCHER_NAME};
pub use mount::{classify, stage, HtmlInput, InputKind, Mounted, Restore, SharedDocument};
pub use report::{filter_violations, format_violations, Palette};
pub use results::{AuditResults, Impact, NodeResult, ToolOptions, Violation};
