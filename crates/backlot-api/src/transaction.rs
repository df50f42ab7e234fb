//! Database transaction utilities
//!
//! Media writes touch more than one table (media, media_tags, media_files),
//! so handlers run them inside a single transaction.

use backlot_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use std::pin::Pin;

/// Execute a closure within a database transaction
///
/// Begins a transaction, executes the provided closure with it, and commits if
/// successful or rolls back on error.
pub async fn with_transaction<T, F>(pool: &PgPool, f: F) -> Result<T, AppError>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'_, Postgres>,
    ) -> Pin<
        Box<dyn std::future::Future<Output = Result<T, AppError>> + Send + 'a>,
    >,
{
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to begin transaction");
        AppError::Database(e)
    })?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to commit transaction");
                AppError::Database(e)
            })?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    error = %rollback_err,
                    original_error = %e,
                    "Failed to rollback transaction"
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    // The closure must only ever run inside an open transaction. With no
    // database behind the pool, begin fails and the closure stays unused.
    #[tokio::test]
    async fn with_transaction_does_not_run_closure_when_begin_fails() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://127.0.0.1:1/backlot")
            .expect("lazy pool");

        let ran = AtomicBool::new(false);
        let result = with_transaction(&pool, |_tx| {
            ran.store(true, Ordering::SeqCst);
            Box::pin(async { Ok(()) })
        })
        .await;

        assert!(result.is_err());
        assert!(!ran.load(Ordering::SeqCst));
    }
}
