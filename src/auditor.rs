// SPDX-License-Identifier: PMPL-1.0-or-later
//! Audit orchestration: prepare, stage, run the engine, restore.
//!
//! Audits against one document must be awaited one at a time. Nothing here
//! serialises them; two overlapping audits would stage over each other.

use crate::config::Config;
use crate::document::Document;
use crate::engine::{AuditEngine, Completion, RunOptions};
use crate::error::{Error, Result};
use crate::mount::{self, HtmlInput, Mounted, SharedDocument};
use crate::results::AuditResults;
use std::sync::Once;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Runs an audit engine against staged markup
pub struct Auditor<E, D> {
    engine: E,
    document: SharedDocument<D>,
    options: RunOptions,
    environment: Once,
}

impl<E, D> Auditor<E, D>
where
    E: AuditEngine,
    D: Document + 'static,
{
    pub fn new(engine: E, document: SharedDocument<D>) -> Self {
        Self {
            engine,
            document,
            options: RunOptions::default(),
            environment: Once::new(),
        }
    }

    /// Options passed to every engine run
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run with the configured rules, tags and impact levels
    pub fn with_config(self, config: &Config) -> Self {
        self.with_options(config.effective_run_options())
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn document(&self) -> &SharedDocument<D> {
        &self.document
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    fn prepare_environment(&self) {
        self.environment.call_once(|| {
            debug!("Preparing document environment");
            mount::lock(&self.document).prepare_environment();
        });
    }

    /// Audit `input` and return the engine's raw result.
    ///
    /// The document root is restored before this future resolves, whether
    /// the engine succeeded, failed, or abandoned the run.
    pub async fn audit(&self, input: impl Into<HtmlInput>) -> Result<AuditResults> {
        self.prepare_environment();

        let body = mount::lock(&self.document).body();
        self.engine.setup(&body);

        let Mounted { root, restore } = mount::stage(&self.document, input.into())?;
        info!("Running audit on <{}>", root.tag_name.to_lowercase());

        let (sender, receiver) = oneshot::channel();
        self.engine.run(root, &self.options, Completion::new(restore, sender));

        receiver.await.unwrap_or(Err(Error::EngineAbandoned))
    }
}
