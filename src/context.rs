//! Run-context contract and the local file-backed implementation.
//!
//! The run context is the host-provided handle through which a run fetches
//! its input version and reports its outcome. Reporting calls are
//! fire-and-forget: the runner consumes no return value from them.

use crate::graph::ObjectNode;
use crate::models::{RunOutcome, RunRecord};
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Host handle for one automation run.
#[async_trait]
pub trait RunContext: Send {
    /// Fetch the current version's root object.
    async fn receive_version(&mut self) -> Result<ObjectNode>;

    /// Report the run as succeeded with a visible summary message.
    fn mark_success(&mut self, message: &str);

    /// Report the run as failed with an error message.
    fn mark_failure(&mut self, message: &str);

    /// Register a local file as a stored run artifact.
    fn store_file(&mut self, path: &Path);
}

/// Run context for CLI invocations outside the platform.
///
/// Reads the version root from a JSON file and records the terminal
/// outcome instead of calling back to a host.
pub struct LocalRunContext {
    input: PathBuf,
    artifacts: Vec<PathBuf>,
    record: Option<RunRecord>,
}

impl LocalRunContext {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            artifacts: Vec::new(),
            record: None,
        }
    }

    /// The recorded terminal outcome, once one has been reported.
    pub fn record(&self) -> Option<&RunRecord> {
        self.record.as_ref()
    }

    fn finish(&mut self, outcome: RunOutcome) {
        self.record = Some(RunRecord {
            finished_at: Utc::now(),
            outcome,
            artifacts: self.artifacts.clone(),
        });
    }
}

#[async_trait]
impl RunContext for LocalRunContext {
    async fn receive_version(&mut self) -> Result<ObjectNode> {
        let raw = tokio::fs::read_to_string(&self.input)
            .await
            .with_context(|| format!("Failed to read model file: {}", self.input.display()))?;

        let root: ObjectNode = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model file: {}", self.input.display()))?;

        Ok(root)
    }

    fn mark_success(&mut self, message: &str) {
        info!("Run succeeded: {}", message);
        self.finish(RunOutcome::Success(message.to_string()));
    }

    fn mark_failure(&mut self, message: &str) {
        error!("Run failed: {}", message);
        self.finish(RunOutcome::Failure(message.to_string()));
    }

    fn store_file(&mut self, path: &Path) {
        info!("Stored artifact: {}", path.display());
        self.artifacts.push(path.to_path_buf());
    }
}
