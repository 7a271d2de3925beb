//! Database initialization and schema migrations.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Initialize the SQLite database with schema and pragmas.
///
/// The pool is the only storage handle in the process; it is created here at
/// startup and injected into the repository, never reached through globals.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool).await?;

    info!("Ledger database initialized at {}", db_path);
    Ok(pool)
}

/// Apply the schema. Every statement is idempotent (`IF NOT EXISTS`).
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema_sql = include_str!("schema.sql");

    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    Ok(())
}

/// Configure SQLite pragmas.
///
/// WAL + busy_timeout is what lets many concurrent purchase transactions
/// serialize at the storage layer instead of failing immediately.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the mode actually set; must use fetch to read it
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    info!("SQLite journal_mode set to: {}", journal_mode);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
