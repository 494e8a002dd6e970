//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database, migrations, default
//! admin, REST API and graceful shutdown. The CLI binary and `main.rs` both
//! start the service through it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::{create_api_router, AppServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true)
    pub auto_migrate: bool,
    /// Create the configured admin when the users table is empty (default: true)
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// The global recorder can only be installed once per process, so a
/// restart within the same process reuses the first handle.
fn prometheus_handle() -> Result<PrometheusHandle, BuildError> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(HANDLE.get_or_init(|| handle).clone())
}

/// A running service
///
/// ```rust,no_run
/// use dinebook::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub services: AppServices,
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the REST API is bound to
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting Dinebook service...");

        let prometheus = prometheus_handle()?;

        let db_config = DatabaseConfig::from(&app_cfg.database);
        info!(url = %db_config.url, "Connecting to database");
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        let jwt_config = JwtConfig::from_security(&app_cfg.security);
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let services = AppServices::new(repos.clone(), jwt_config);

        if opts.create_default_admin {
            match services.identity.ensure_default_admin(&app_cfg.admin).await {
                Ok(Some(admin)) => info!(email = %admin.email, "Default admin created"),
                Ok(None) => {}
                Err(e) => error!("Failed to create default admin: {}", e),
            }
        }

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let router = create_api_router(services.clone(), db.clone(), prometheus);

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            services,
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests to drain, bounded by
    /// `server.shutdown_timeout`, then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .run_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            warn!("Closing database with requests still in flight");
        }

        match db.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!("Error closing database connection: {}", e),
        }
        info!("Dinebook shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber from `[logging]`. `RUST_LOG` wins
/// over the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.database.pool = PoolConfig {
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 5,
        };
        ServerOptions {
            config,
            ..Default::default()
        }
    }

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_requests_seeds_admin_and_shuts_down() {
        let handle = ServerHandle::start(options()).await.unwrap();
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count().await.unwrap(), 1);

        let response = get(handle.local_addr, "/health").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        assert!(response.to_lowercase().contains("x-request-id"));

        let response = get(handle.local_addr, "/metrics").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);

        tokio::time::timeout(std::time::Duration::from_secs(10), handle.shutdown())
            .await
            .expect("shutdown finished");
    }

    #[tokio::test]
    async fn default_admin_can_be_skipped() {
        let handle = ServerHandle::start(ServerOptions {
            create_default_admin: false,
            ..options()
        })
        .await
        .unwrap();
        assert_eq!(handle.repos.users().count().await.unwrap(), 0);
        handle.shutdown().await;
    }
}
