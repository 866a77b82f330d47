//! Octoquery - natural-language GitHub queries through an AI agent
//!
//! A CLI tool that forwards a question about a GitHub repository to an
//! AI agent and lets the agent answer it by calling the official GitHub
//! MCP server (run unmodified in Docker).
//!
//! Exit codes:
//!   0 - Success (the agent produced an answer)
//!   1 - Invalid arguments, missing credentials, timeout, or any other failure

mod agent;
mod cli;
mod config;
mod env;
mod mcp;
mod query;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Seed the environment from a nearby .env before clap reads env vars
    let dotenv_path = env::load_dotenv(".env");

    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Octoquery v{}", env!("CARGO_PKG_VERSION"));
    match dotenv_path {
        Some(ref path) => info!("Loaded environment variables from {}", path.display()),
        None => debug!("No .env file found, using the process environment only"),
    }

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let credentials = env::Credentials::from_env();
    debug!("Credentials:\n{}", credentials.masked_summary());

    if args.check_env {
        return handle_check_env(&credentials);
    }

    // Fail up front, naming every missing variable at once
    if let Err(e) = env::require_all(env::REQUIRED_VARS) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let repo = args.repo.clone().unwrap_or_default();
    let query_text = args.effective_query().unwrap_or_default();
    let full_query = query::compose_query(&query_text, &repo);

    info!(model = %config.model.name, "Running query");
    debug!(query = %full_query, "Composed query");

    let spinner = make_spinner(args.quiet);
    let answer = agent::run_github_agent(&config, &credentials, &full_query).await;
    spinner.finish_and_clear();

    println!("{}", answer);

    // The invocation reports every failure class as an error string
    if answer.starts_with("Error:") {
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .octoquery.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".octoquery.toml");

    if path.exists() {
        eprintln!("⚠️  .octoquery.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .octoquery.toml")?;

    println!("✅ Created .octoquery.toml with default settings.");
    println!("   Edit it to customize model, API base, and timeout.");
    Ok(())
}

/// Handle --check-env: show masked credentials and validate the required set.
fn handle_check_env(credentials: &env::Credentials) -> Result<()> {
    println!("{}", credentials.masked_summary());

    match env::require_all(env::REQUIRED_VARS) {
        Ok(()) => {
            println!("✅ All required environment variables are set.");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
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
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
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
            info!("Loaded default config from .octoquery.toml");
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

/// Spinner shown while the agent call is in flight.
fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Analyzing GitHub repository...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
