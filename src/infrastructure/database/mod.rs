pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::{DatabaseSection, PoolConfig};

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// e.g. `sqlite://./dinebook.db?mode=rwc`
    pub url: String,
    pub pool: PoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&DatabaseSection::default())
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            url: section.connection_url(),
            pool: section.pool.clone(),
        }
    }
}

impl DatabaseConfig {
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            pool: PoolConfig::default(),
        }
    }

    /// A private in-memory SQLite database. Every pooled connection would
    /// get its own empty database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool: PoolConfig {
                max_connections: 1,
                min_connections: 1,
                connect_timeout_secs: 5,
            },
        }
    }
}

pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .connect_timeout(Duration::from_secs(config.pool.connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Fresh migrated in-memory database for tests
#[cfg(test)]
pub(crate) async fn test_db() -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    migrator::Migrator::up(&db, None).await.expect("migrations");
    db
}

/// Migrated SQLite file under `dir` with a multi-connection pool, for tests
/// where transactions have to overlap
#[cfg(test)]
pub(crate) async fn file_db(dir: &std::path::Path, max_connections: u32) -> DatabaseConnection {
    use sea_orm_migration::MigratorTrait;

    let mut config = DatabaseConfig::sqlite(&dir.join("dinebook.db").to_string_lossy());
    config.pool.max_connections = max_connections;
    let db = init_database(&config).await.expect("file database");
    migrator::Migrator::up(&db, None).await.expect("migrations");
    db
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn migrations_create_every_table() {
        let db = test_db().await;
        for table in ["users", "restaurants", "reviews", "bookings"] {
            let row = db
                .query_one(Statement::from_string(
                    db.get_database_backend(),
                    format!(
                        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = '{}'",
                        table
                    ),
                ))
                .await
                .unwrap();
            assert!(row.is_some(), "missing table {}", table);
        }
    }

    #[test]
    fn config_follows_section() {
        let section = DatabaseSection::default();
        let cfg = DatabaseConfig::from(&section);
        assert_eq!(cfg.url, section.url);
        assert_eq!(cfg.pool, section.pool);
    }
}
