//! Dinebook service
//!
//! Reads configuration from `DINEBOOK_CONFIG` or
//! `~/.config/dinebook/config.toml`. See the `dinebook-cli` crate for
//! command-line overrides.

use tracing::{error, info};

use dinebook::server::{init_tracing, ServerHandle, ServerOptions};
use dinebook::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("DINEBOOK_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..Default::default()
    })
    .await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
