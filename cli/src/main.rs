//! Dinebook command-line launcher
//!
//! ```sh
//! # Default config (~/.config/dinebook/config.toml)
//! dinebook-cli
//!
//! # Custom config and port
//! dinebook-cli --config /etc/dinebook/config.toml --api-port 9000
//!
//! # Validate config without starting
//! dinebook-cli --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use dinebook::config::AppConfig;
use dinebook::server::{init_tracing, ServerHandle, ServerOptions};

/// Restaurant discovery and table booking service.
#[derive(Parser, Debug)]
#[command(name = "dinebook-cli", version, about)]
struct Cli {
    /// Path to the configuration file (TOML)
    #[arg(short, long, env = "DINEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user
    #[arg(long)]
    no_admin: bool,
}

fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(dinebook::default_config_path);
    let mut config = AppConfig::load(&config_path)?;
    apply_overrides(&cli, &mut config);

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!(
            "   API address : {}:{}",
            config.server.api_host, config.server.api_port
        );
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
