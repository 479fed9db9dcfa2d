/**
 * Database Bootstrap
 *
 * Opens the SQLite pool named by `database_url`, applies the migrations in
 * `migrations/` and seeds the singleton system documents.
 *
 * # In-memory databases
 *
 * Every connection to `sqlite::memory:` opens its own empty database, so
 * in-memory URLs get exactly one connection that is never recycled.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::backend::library::db::METADATA_KEY;
use crate::shared::LibraryMetadata;

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Load and initialize the database connection pool
///
/// 1. Parses `database_url` into connect options (foreign keys on, file
///    created if missing)
/// 2. Creates the pool
/// 3. Runs database migrations
/// 4. Seeds the system documents
///
/// # Errors
///
/// Unlike a missing optional service, a database failure is fatal: the
/// portal has nothing to serve without it.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("[Database] Connecting to {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?
    };

    tracing::info!("[Database] Running migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("[Database] Migrations completed successfully");

    seed_system_documents(&pool).await?;

    Ok(pool)
}

/// Insert the library metadata document when it does not exist yet.
///
/// The changelog document is left absent; readers fall back to the default
/// HTML until an admin saves one.
pub async fn seed_system_documents(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let metadata = serde_json::to_string(&LibraryMetadata::default())
        .map_err(|e| sqlx::Error::Protocol(format!("metadata seed: {}", e)))?;

    let result = sqlx::query(
        "INSERT OR IGNORE INTO system_documents (key, body, updated_at) VALUES (?, ?, ?)",
    )
    .bind(METADATA_KEY)
    .bind(metadata)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!("[Database] Seeded default library metadata");
    }

    Ok(())
}
