//! handoff CLI - test result submission build step.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use handoff::config::{self, Config};
use handoff::environment::BuildEnv;
use handoff::listener::ConsoleListener;
use handoff::orchestrator::Orchestrator;
use handoff::sender::http::HttpSender;
use handoff::sender::{CredentialCheck, ResultSender};
use handoff::submission::MissingKeyStrategy;

#[derive(Parser)]
#[command(name = "handoff")]
#[command(about = "Submit automated test results to a tracker test plan", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "handoff.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect result files and send them to the configured test plan
    Send {
        /// Build workspace root to collect result files from
        #[arg(short, long, default_value = ".")]
        workspace: PathBuf,
    },

    /// Check tracker connectivity and credentials
    Check,

    /// Validate configuration file
    Validate,

    /// Initialize a new configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Send { workspace } => send(&cli.config, &workspace).await,
        Commands::Check => check(&cli.config).await,
        Commands::Validate => validate_config(&cli.config),
        Commands::Init => init_config(&cli.config),
    }
}

async fn send(config_path: &Path, workspace: &Path) -> Result<()> {
    let config = load(config_path)?;

    info!("Loaded configuration from {}", config_path.display());

    let orchestrator = Orchestrator::new(config, HttpSender::new(), ConsoleListener);
    let status = orchestrator.run(workspace, &BuildEnv::from_process()).await;

    std::process::exit(status.exit_code());
}

async fn check(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;
    let sender = HttpSender::new();

    let result = sender
        .validate_credentials(
            &config.tracker.url,
            &config.tracker.username,
            &config.tracker.password,
        )
        .await;

    match result {
        CredentialCheck::Valid => {
            println!("{}", console::style("Connection successful").green());
            Ok(())
        }
        CredentialCheck::InvalidCredentials => {
            eprintln!("{}", console::style("Invalid username or password").red());
            std::process::exit(1);
        }
        CredentialCheck::InvalidUrl => {
            eprintln!("{}", console::style("Invalid address").red());
            std::process::exit(1);
        }
        CredentialCheck::UnexpectedError(message) => {
            eprintln!(
                "{}",
                console::style(format!(
                    "An unexpected error occurred while testing tracker credentials: {message}"
                ))
                .red()
            );
            std::process::exit(1);
        }
    }
}

fn validate_config(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;

    println!("{}", console::style("Configuration is valid").green());
    println!("  Tracker:  {}", config.tracker.url);
    println!("  Pattern:  {}", config.send.results_pattern);
    println!("  Format:   {}", config.send.results_type.as_param());
    println!(
        "  Missing key: {}",
        match config.send.missing_key_strategy {
            MissingKeyStrategy::FailTask => "fail the build",
            MissingKeyStrategy::SkipTask => "skip silently",
        }
    );

    Ok(())
}

fn init_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    std::fs::write(config_path, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!("Edit the tracker section, then run: handoff send");

    Ok(())
}

fn load(config_path: &Path) -> Result<Config> {
    config::load_config(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))
}

const SAMPLE_CONFIG: &str = r#"# handoff configuration

[tracker]
url = "https://tracker.example.com"
username = "ci-bot"
password = "change-me"

[send]
# Glob pattern selecting result files, relative to the workspace root.
results_pattern = "**/target/surefire-reports/*.xml"

# Report format: junit | testng | cucumber | nunit
results_type = "junit"

# When the TEST_PLAN_KEY build parameter is absent: fail_task | skip_task
missing_key_strategy = "fail_task"

# Wait for an import already running on the target test plan.
retry_on_active_import = false

# Emit timestamped progress lines to the build log.
verbose = false
"#;
