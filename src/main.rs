//! Atlas Triage - Main Entry Point
//!
//! CLI wrapper around the triage pipeline: an HTTP adapter, a fixed
//! scenario batch driver, and a configuration validator.

use atlas_triage::config::TriageConfig;
use atlas_triage::llm::provider::LlmProvider;
use atlas_triage::llm::providers::{GeminiConfig, GeminiProvider};
use atlas_triage::observability::init_default_logging;
use atlas_triage::server::TriageServer;
use atlas_triage::triage::TriagePipeline;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Mortgage servicing inquiry triage service
#[derive(Parser)]
#[command(name = "atlas-triage")]
#[command(about = "Routes mortgage servicing inquiries to specialty responders")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP adapter
    Serve {
        /// Listen port, overriding the configured value
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the fixed inquiry scenarios through the pipeline
    Batch,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting atlas-triage v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve { port } => run_server(config, port).await,
        Commands::Batch => run_batch_driver(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Shutdown complete");
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<TriageConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(TriageConfig::load_from_file(path)?)
        }
        None => {
            // Try default locations
            let default_paths = vec!["triage.toml", "config/triage.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(TriageConfig::load_from_file(&path)?);
                }
            }

            error!(
                "No configuration file found. Please provide one with -c/--config or create triage.toml"
            );
            process::exit(1);
        }
    }
}

/// Provider factory for creating LLM providers from configuration
struct LlmProviderFactory;

impl LlmProviderFactory {
    fn create_provider(
        config: &TriageConfig,
    ) -> Result<Arc<dyn LlmProvider>, Box<dyn std::error::Error>> {
        match config.llm.provider.as_str() {
            "gemini" => {
                let api_key = config.resolve_api_key()?;
                let gemini_config = GeminiConfig {
                    api_key,
                    ..Default::default()
                };
                let provider = GeminiProvider::new(gemini_config)?;
                Ok(Arc::new(provider))
            }
            provider => Err(format!("Unsupported LLM provider: {provider}").into()),
        }
    }
}

async fn run_server(
    config: TriageConfig,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Credential policy for the HTTP surface: a missing key does not stop
    // the server, it leaves the pipeline slot empty and every inquiry is
    // answered with a configuration error.
    let pipeline = match LlmProviderFactory::create_provider(&config) {
        Ok(provider) => Some(Arc::new(TriagePipeline::from_config(&config, provider))),
        Err(e) => {
            warn!("LLM provider unavailable, serving unconfigured: {}", e);
            None
        }
    };

    let server = Arc::new(TriageServer::new(config.service.id.clone(), pipeline));
    let port = port_override.unwrap_or(config.server.port);

    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    let shutdown = async move {
        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    server.run(port, shutdown).await;
    Ok(())
}

async fn run_batch_driver(config: TriageConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Batch runs fail fast on a missing credential
    let provider = LlmProviderFactory::create_provider(&config)?;
    let pipeline = TriagePipeline::from_config(&config, provider);

    let (completed, failed) = atlas_triage::batch::run_batch(&pipeline).await;
    info!(completed, failed, "Batch run finished");

    Ok(())
}

fn handle_config_command(
    config: TriageConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}
