//! Analysis runner: the single-pass pipeline from model retrieval to
//! result reporting.
//!
//! The flow is strictly linear. Every step runs under one failure boundary:
//! any error is caught, formatted, and reported as a failure outcome, so
//! exactly one terminal report leaves each invocation and no error escapes
//! [`AnalysisRunner::run`].

use crate::config::Config;
use crate::context::RunContext;
use crate::graph;
use crate::llm::{ChatClient, ChatMessage};
use crate::models::{FlatObject, RunOutcome, TypeTally};
use crate::report;
use crate::rules::{self, ValidationRule};
use crate::summary;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Visible success messages carry at most this many characters of the
/// analysis text.
const SUMMARY_MESSAGE_CHARS: usize = 200;

/// Orchestrates one analysis run.
pub struct AnalysisRunner<'a> {
    config: &'a Config,
    client: &'a dyn ChatClient,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl<'a> AnalysisRunner<'a> {
    /// Build a runner from configuration and a completion client.
    ///
    /// Fails when the configuration names an unknown check.
    pub fn new(config: &'a Config, client: &'a dyn ChatClient) -> Result<Self> {
        let rules = rules::build_rules(&config.analysis.checks)?;
        Ok(Self {
            config,
            client,
            rules,
        })
    }

    /// Run the full pipeline and report exactly one terminal outcome.
    pub async fn run(&self, ctx: &mut dyn RunContext) -> RunOutcome {
        match self.execute(ctx).await {
            Ok(message) => RunOutcome::Success(message),
            Err(e) => {
                let message = format!("Analysis failed: {:#}", e);
                ctx.mark_failure(&message);
                RunOutcome::Failure(message)
            }
        }
    }

    /// Flatten and summarize only, without calling the model.
    pub async fn dry_run(&self, ctx: &mut dyn RunContext) -> Result<String> {
        let root = ctx
            .receive_version()
            .await
            .context("Failed to receive the model version")?;
        let objects = graph::flatten(&root);

        Ok(self.summarize(&objects))
    }

    async fn execute(&self, ctx: &mut dyn RunContext) -> Result<String> {
        let root = ctx
            .receive_version()
            .await
            .context("Failed to receive the model version")?;

        let objects = graph::flatten(&root);
        info!("Flattened model into {} objects", objects.len());

        let data_summary = self.summarize(&objects);
        debug!("Data summary:\n{}", data_summary);

        let messages = vec![
            ChatMessage::system(ANALYST_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "{}\n\n{}",
                self.config.analysis.prompt, data_summary
            )),
        ];

        let analysis = self
            .client
            .complete(&self.config.model.name, &messages)
            .await
            .context("Completion request failed")?;
        info!("Received analysis ({} chars)", analysis.chars().count());

        let report_path = Path::new(&self.config.report.output);
        report::write_report(report_path, &analysis)?;
        ctx.store_file(report_path);

        let message = format!(
            "Analysis complete: {}",
            truncate_chars(&analysis, SUMMARY_MESSAGE_CHARS)
        );
        ctx.mark_success(&message);

        Ok(message)
    }

    /// Build the plain-text data summary over the bounded sample.
    fn summarize(&self, objects: &[FlatObject]) -> String {
        let bound = objects.len().min(self.config.analysis.sample_size);
        let sample = &objects[..bound];

        let tally = TypeTally::from_objects(sample);
        let findings = if self.rules.is_empty() {
            None
        } else {
            Some(rules::apply_rules(&self.rules, sample))
        };

        summary::render_data_summary(objects.len(), sample.len(), &tally, findings.as_deref())
    }
}

/// Take the first `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Persona for the analysis request. The user message carries the
/// configured instruction and the data summary.
const ANALYST_SYSTEM_PROMPT: &str =
    "You are an expert BIM data analyst. You review building model contents \
     and point out quality issues, inconsistencies, and optimization \
     opportunities in clear, concise language.";
