//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.bimlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Settings for the data summary and consistency checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Instruction sent to the model along with the data summary.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Maximum number of flattened objects considered for the summary.
    ///
    /// An upper bound, not a guarantee: smaller models yield smaller samples.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Names of the consistency checks to run over the sample.
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            sample_size: default_sample_size(),
            checks: default_checks(),
        }
    }
}

fn default_prompt() -> String {
    "Review the following BIM objects and identify possible inconsistencies or optimizations."
        .to_string()
}

fn default_sample_size() -> usize {
    150
}

fn default_checks() -> Vec<String> {
    vec!["missing-material".to_string()]
}

/// LLM model settings.
///
/// The API key is deliberately not a config-file field; it arrives via the
/// CLI or the `OPENAI_API_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Temperature for generation. Omitted from requests when unset.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report file path, relative to the working directory.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "bim_analysis_report.md".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
    /// can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".bimlens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings and only
    /// override when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref prompt) = args.prompt {
            self.analysis.prompt = prompt.clone();
        }
        if let Some(sample_size) = args.sample_size {
            self.analysis.sample_size = sample_size;
        }
        if args.no_checks {
            self.analysis.checks.clear();
        }

        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref base_url) = args.api_base_url {
            self.model.api_base_url = base_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
