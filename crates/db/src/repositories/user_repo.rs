//! Repository for the `utenti` table.
//!
//! Row storage only. Password hashing and session handling belong to the
//! host application.

use sqlx::SqlitePool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries.
const COLUMNS: &str = "id, username, password_hash, created_at";

/// Provides lookup and creation of user rows.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by username.
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM utenti WHERE username = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Insert a user with a caller-provided password hash.
    ///
    /// Idempotent on username: an existing user is left untouched.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT OR IGNORE INTO utenti (username, password_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await?;
        Ok(())
    }
}
