//! bimlens - LLM-assisted analysis of BIM model versions
//!
//! A CLI automation hook that flattens a model version into a list of
//! objects, summarizes object types (plus optional consistency checks),
//! asks an OpenAI-compatible model for an analysis, and writes the
//! response to a markdown report.
//!
//! Exit codes:
//!   0 - Success (or completed dry run)
//!   1 - Runtime/config error, or the run reported a failure outcome

mod cli;
mod config;
mod context;
mod graph;
mod llm;
mod models;
mod report;
mod rules;
mod runner;
mod summary;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use context::LocalRunContext;
use indicatif::ProgressBar;
use llm::OpenAiClient;
use models::{RunOutcome, Secret};
use runner::AnalysisRunner;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("bimlens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .bimlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".bimlens.toml");

    if path.exists() {
        eprintln!("⚠️  .bimlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .bimlens.toml")?;

    println!("✅ Created .bimlens.toml with default settings.");
    println!("   Edit it to customize the prompt, sample size, checks, and model.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the analysis workflow. Returns the process exit code.
async fn run_analysis(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = args
        .input
        .clone()
        .context("An input model file is required")?;
    let mut ctx = LocalRunContext::new(input.clone());

    // An absent key is only possible on paths that never call the API;
    // an empty one would surface as an authentication failure downstream.
    let api_key = args
        .api_key
        .clone()
        .unwrap_or_else(|| Secret::new(String::new()));

    let client = OpenAiClient::new(
        &api_key,
        config.model.api_base_url.as_str(),
        config.model.timeout_seconds,
        config.model.temperature,
    )?;
    let runner = AnalysisRunner::new(&config, &client)?;

    // Handle --dry-run: summarize and exit
    if args.dry_run {
        return handle_dry_run(&runner, &mut ctx).await;
    }

    println!("📥 Model version: {}", input.display());
    println!("🤖 Requesting analysis...");
    println!("   Model: {}", config.model.name);
    println!("   Endpoint: {}", config.model.api_base_url);
    println!("   Timeout: {}s", config.model.timeout_seconds);

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Waiting for the model analysis...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let outcome = runner.run(&mut ctx).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match outcome {
        RunOutcome::Success(message) => {
            println!("\n✅ {}", message);
            println!("   Report saved to: {}", config.report.output);
            if let Some(record) = ctx.record() {
                info!(
                    "Run finished at {}",
                    record.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
            Ok(0)
        }
        RunOutcome::Failure(message) => {
            eprintln!("\n❌ {}", message);
            Ok(1)
        }
    }
}

/// Handle --dry-run: flatten, summarize, print, exit.
async fn handle_dry_run(runner: &AnalysisRunner<'_>, ctx: &mut LocalRunContext) -> Result<i32> {
    println!("\n🔍 Dry run: summarizing the model (no completion call)...\n");

    let summary = runner.dry_run(ctx).await?;
    println!("{}", summary);

    println!("✅ Dry run complete. No completion calls were made.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .bimlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
