//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Secret;
use clap::Parser;
use std::path::PathBuf;

/// bimlens - LLM-assisted analysis of BIM model versions
///
/// Flatten a model version, summarize its object types, optionally run
/// consistency checks, and send the summary to an OpenAI-compatible model
/// for analysis. The response is written to a markdown report.
///
/// Examples:
///   bimlens --input version.json
///   bimlens --input version.json --prompt "Focus on structural elements."
///   bimlens --input version.json --sample-size 100 --no-checks
///   bimlens --input version.json --dry-run
///   bimlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Model version JSON file to analyze
    ///
    /// A nested object graph as exported from the collaboration platform.
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "init_config"
    )]
    pub input: Option<PathBuf>,

    /// API key for the completion endpoint
    ///
    /// Never logged and never written to the report. Not required for
    /// --dry-run or --init-config.
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        value_name = "KEY",
        required_unless_present_any = ["init_config", "dry_run"]
    )]
    pub api_key: Option<Secret>,

    /// Instruction sent to the model along with the data summary
    ///
    /// Defaults to the built-in instruction text (see .bimlens.toml).
    #[arg(short, long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Model to use for the analysis
    #[arg(short, long, env = "BIMLENS_MODEL", value_name = "NAME")]
    pub model: Option<String>,

    /// Maximum number of flattened objects considered for the summary
    #[arg(long, value_name = "COUNT")]
    pub sample_size: Option<usize>,

    /// Disable all rule-based consistency checks
    #[arg(long)]
    pub no_checks: bool,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .bimlens.toml in the current directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: flatten and summarize without calling the model
    ///
    /// Prints the data summary that would be sent and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .bimlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Input path is not a file: {}", input.display()));
            }
        }

        if let Some(sample_size) = self.sample_size {
            if sample_size == 0 {
                return Err("Sample size must be at least 1".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref base_url) = self.api_base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            api_key: Some(Secret::new("test-key")),
            prompt: None,
            model: None,
            sample_size: None,
            no_checks: false,
            output: None,
            api_base_url: None,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_missing_input_file() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("definitely/not/here.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_sample_size() {
        let mut args = make_args();
        args.sample_size = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let mut args = make_args();
        args.api_base_url = Some("ftp://somewhere".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.init_config = true;
        args.sample_size = Some(0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_args_debug_does_not_leak_api_key() {
        let args = make_args();
        let rendered = format!("{:?}", args);
        assert!(!rendered.contains("test-key"));
    }
}
