//! SQLite persistence layer for the magazzino inventory backend.
//!
//! Repositories are zero-sized structs providing async methods that accept
//! `&SqlitePool` as the first argument. Plain CRUD returns
//! `Result<_, sqlx::Error>`; operations with domain failure semantics
//! (insufficient stock, missing cells, rejected input) return
//! [`error::StoreResult`].
//!
//! A host process calls [`bootstrap`] once at startup; everything it does is
//! idempotent, so restarting is always safe.

pub mod error;
pub mod legacy;
pub mod models;
pub mod repositories;
pub mod schema;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::legacy::MigrationReport;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite connection URL (default: `sqlite:DATI/database.db`).
    pub url: String,
    /// Maximum connections in the pool (default: `5`).
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                   |
    /// |----------------------|---------------------------|
    /// | `DATABASE_URL`       | `sqlite:DATI/database.db` |
    /// | `DB_MAX_CONNECTIONS` | `5`                       |
    pub fn from_env() -> Self {
        let url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:DATI/database.db".into());

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        Self {
            url,
            max_connections,
        }
    }

    /// Configuration for a database file at `path`.
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite:{path}"),
            max_connections: 5,
        }
    }
}

/// Create a connection pool from the given configuration.
///
/// Creates the database file if it does not exist yet and enforces foreign
/// keys on every connection.
pub async fn create_pool(config: &DbConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Verify the database answers queries.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Prepare a database for use: schema bootstrap followed by the legacy
/// single-color backfill.
///
/// Run once at process start. Both steps are idempotent, so a database that
/// is already up to date passes through unchanged.
pub async fn bootstrap(pool: &SqlitePool) -> Result<MigrationReport, sqlx::Error> {
    schema::init(pool).await?;
    legacy::backfill_legacy_colors(pool).await
}
