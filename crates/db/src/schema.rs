//! Schema bootstrap and additive column migrations.
//!
//! All CREATE TABLE statements live here. The on-disk schema keeps the
//! table and column names of the original deployment, so existing database
//! files open unchanged; `init` only ever adds, it never drops or rewrites
//! a row.

use chrono::Utc;
use sqlx::SqlitePool;

/// Ensure all tables exist and additive column migrations are applied.
///
/// Idempotent; safe to run on every start.
pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_tables(pool).await?;

    // Columns added after the first release; older files lack them.
    ensure_column(pool, "prodotti", "categoria", "TEXT").await?;
    ensure_column(pool, "prodotti", "colore", "TEXT").await?;
    ensure_column(pool, "prodotti", "created_at", "TEXT").await?;
    ensure_column(pool, "prodotti", "updated_at", "TEXT").await?;
    ensure_column(pool, "taglie_prodotti", "colore", "TEXT").await?;

    // Rows created before timestamps existed get stamped now.
    let now = Utc::now();
    sqlx::query(
        "UPDATE prodotti \
         SET created_at = COALESCE(created_at, ?), \
             updated_at = COALESCE(updated_at, ?)",
    )
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::info!("Database schema verified");
    Ok(())
}

async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS categorie (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT UNIQUE
        )",
    )
    .execute(pool)
    .await?;

    // `colore` is the legacy single-color field, kept for migration.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS prodotti (
            codice TEXT PRIMARY KEY,
            nome TEXT,
            categoria TEXT,
            colore TEXT,
            materiali TEXT,
            descrizione TEXT,
            costo_unitario REAL,
            prezzo_range TEXT,
            produzione TEXT,
            tipo_taglie TEXT,
            venduti INTEGER DEFAULT 0,
            created_at TEXT,
            updated_at TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS colori_prodotti (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codice_prodotto TEXT,
            colore TEXT,
            UNIQUE(codice_prodotto, colore),
            FOREIGN KEY (codice_prodotto) REFERENCES prodotti(codice)
        )",
    )
    .execute(pool)
    .await?;

    // One row per (product, color, size) variant.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS taglie_prodotti (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codice_prodotto TEXT,
            colore TEXT,
            taglia TEXT,
            quantita INTEGER,
            FOREIGN KEY (codice_prodotto) REFERENCES prodotti(codice)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS immagini_prodotti (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codice_prodotto TEXT,
            percorso_file TEXT,
            ordine INTEGER,
            principale INTEGER,
            FOREIGN KEY (codice_prodotto) REFERENCES prodotti(codice)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS utenti (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Add `column` to `table` if it is not already present.
async fn ensure_column(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    decl: &str,
) -> Result<(), sqlx::Error> {
    let existing: Vec<(String,)> =
        sqlx::query_as(&format!("SELECT name FROM pragma_table_info('{table}')"))
            .fetch_all(pool)
            .await?;

    if existing.iter().any(|(name,)| name == column) {
        return Ok(());
    }

    sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))
        .execute(pool)
        .await?;
    tracing::info!(table, column, "Added missing column");
    Ok(())
}
