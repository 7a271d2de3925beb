//! The ledger engine: orchestrators for purchases, withdrawals, and
//! points top-ups.
//!
//! Every operation runs as one storage transaction; business failures roll
//! back with no partial mutation visible. Busy/locked storage errors are
//! retried a bounded number of times before surfacing as a conflict.

mod purchase;
mod topup;
mod withdrawal;

use crate::config::Config;
use crate::db::Repository;
use crate::error::LedgerError;
use std::sync::Arc;
use std::time::Duration;

/// The credit ledger and enrollment transaction engine.
#[derive(Clone)]
pub struct LedgerEngine {
    repo: Arc<Repository>,
    config: Config,
}

impl LedgerEngine {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        Self { repo, config }
    }

    pub fn repo(&self) -> &Arc<Repository> {
        &self.repo
    }

    /// Run `op` with bounded retries on busy/locked storage errors.
    ///
    /// Business-rule failures pass through untouched; only transient
    /// contention is retried, and exhausting the budget surfaces
    /// `StorageConflict`.
    pub(crate) async fn with_conflict_retry<T, F, Fut>(&self, mut op: F) -> Result<T, LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, LedgerError>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Err(LedgerError::Storage(err)) if is_busy(&err) => {
                    if attempt >= self.config.max_conflict_retries {
                        tracing::warn!(attempts = attempt, "storage still busy, giving up");
                        return Err(LedgerError::StorageConflict);
                    }
                    attempt += 1;
                    tracing::debug!(attempt, "storage busy, retrying");
                    tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
                }
                other => return other,
            }
        }
    }
}

/// SQLite reports writer contention as SQLITE_BUSY (5) or SQLITE_LOCKED (6).
fn is_busy(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.code().as_deref(), Some("5") | Some("6") | Some("517"))
                || db_err.message().contains("locked")
                || db_err.message().contains("busy")
        }
        _ => false,
    }
}
