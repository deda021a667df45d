//! # Citation Network Server Main Driver
//!
//! ## Purpose
//! Main entry point for the citation network server. Orchestrates
//! initialization of all system components and starts the web server for
//! handling extraction and network-building requests.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment variables
//! - **Output**: Running web server with extraction API endpoints
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Compile the pattern library and build the extractor
//! 4. Initialize the network builder
//! 5. Start web API server
//! 6. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use citation_network::{
    api::ApiServer,
    config::Config,
    errors::{CitationError, Result},
    extractor::CitationExtractor,
    network::NetworkBuilder,
    AppState, CaseDocument,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("citation-network-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Legal Analytics Team")
        .about("Legal citation extraction and precedent network builder")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Run health checks and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches
        .get_one::<String>("config")
        .expect("config has a default value");
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Citation Network Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Run health checks if requested
    if matches.get_flag("check-health") {
        return run_health_checks();
    }

    // Initialize application components
    let app_state = initialize_components(config.clone())?;

    // Start the API server
    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Citation network server started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Citation network server shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config
            .logging
            .level
            .parse()
            .map_err(|_| CitationError::Config {
                message: format!("Invalid log level: {}", config.logging.level),
            })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_filter(filter),
            )
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Initializing application components...");

    info!("Compiling pattern library...");
    let extractor = Arc::new(CitationExtractor::with_config(config.extraction.clone())?);

    info!("Initializing network builder...");
    let network_builder = Arc::new(NetworkBuilder::from_config(
        extractor.clone(),
        &config.network,
    ));

    let app_state = AppState {
        config,
        extractor,
        network_builder,
    };

    info!("All components initialized successfully");
    Ok(app_state)
}

/// Run comprehensive health checks
fn run_health_checks() -> Result<()> {
    info!("Running health checks...");

    // Pattern tables must compile
    let extractor = CitationExtractor::new()?;
    info!("✓ Pattern library compiled");

    // Extraction smoke test against a known citation
    let probe = CaseDocument {
        id: "health-probe".to_string(),
        title: String::new(),
        content: "As established in Brown v. Board, 347 U.S. 483 (1954).".to_string(),
    };
    if extractor.extract_citations(&probe).is_empty() {
        return Err(CitationError::Internal {
            message: "Extraction smoke test found no citations".to_string(),
        });
    }
    info!("✓ Extraction smoke test passed");

    info!("All health checks passed!");
    Ok(())
}
