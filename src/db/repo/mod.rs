//! Repository layer for database operations.
//!
//! All reads go through the pool; every multi-step mutation runs inside a
//! single sqlx transaction handed out by [`Repository::begin`], so the
//! orchestrators decide the atomicity boundary and the repository only
//! supplies the statements. Methods are organized across submodules:
//! - `actors.rs` - accounts and balance mutations
//! - `subjects.rs` - subject read model, stats, teacher assignment
//! - `enrollments.rs` - the enrollment ledger
//! - `transactions.rs` - the append-only transaction log

mod actors;
mod enrollments;
mod subjects;
mod transactions;

use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};

/// Repository over an injected SQLite pool.
pub struct Repository {
    pool: SqlitePool,
}

/// A storage transaction scoping one logical ledger operation.
pub type Tx<'a> = Transaction<'a, Sqlite>;

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a storage transaction. Dropping it without commit rolls back.
    pub async fn begin(&self) -> Result<Tx<'_>, sqlx::Error> {
        self.pool.begin().await
    }
}
