use crate::error::{StoreError, StoreResult};
use log::{LevelFilter, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::{env, time::Duration};

/// Pool size used when `DATABASE_MAX_CONNECTIONS` is unset
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub sql_logging: bool,
}

impl DatabaseConfig {
    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS` and `DATABASE_SQL_LOGGING`,
    /// loading a `.env` file first when one exists
    pub fn from_env() -> StoreResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| StoreError::Configuration("DATABASE_URL is not set".to_string()))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                StoreError::Configuration(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}"
                ))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let sql_logging = match lookup("DATABASE_SQL_LOGGING").as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(StoreError::Configuration(format!(
                    "DATABASE_SQL_LOGGING must be true or false, got {other:?}"
                )));
            }
        };

        Ok(Self {
            url,
            max_connections,
            sql_logging,
        })
    }
}

/// Opens a connection pool with the given settings
pub async fn connect(config: &DatabaseConfig) -> StoreResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(config.sql_logging)
        .sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(options).await?;
    info!(
        "Connected to {:?} database (pool size {})",
        db.get_database_backend(),
        config.max_connections
    );
    Ok(db)
}

/// Creates a database connection from the environment
pub async fn create_connection() -> StoreResult<DatabaseConnection> {
    let config = DatabaseConfig::from_env()?;
    connect(&config).await
}

/// Opens a private in-memory SQLite store with the full schema applied
pub async fn connect_in_memory() -> StoreResult<DatabaseConnection> {
    // Every SQLite memory connection is its own database, so the pool holds exactly one
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    run_migrations(&db).await?;
    Ok(db)
}

/// Applies every pending migration
pub async fn run_migrations(db: &DatabaseConnection) -> StoreResult<()> {
    Migrator::up(db, None).await?;
    info!("Database schema is up to date");
    Ok(())
}

/// Closes the pool, waiting for checked-out connections to be returned
pub async fn close_connection(db: DatabaseConnection) -> StoreResult<()> {
    db.close().await?;
    info!("Database connection closed");
    Ok(())
}
