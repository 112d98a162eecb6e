use crate::error::DbError;
use chrono::{DateTime, Months, NaiveDate, Utc};
use core_types::{Backend, TIME_DAY};
use sqlx::AnyPool;
use std::time::Duration;

/// How often the retention sweep runs.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Rows older than this many months are eligible for deletion.
const RETENTION_MONTHS: u32 = 3;

/// The time-series tables subject to the retention window.
const SWEPT_TABLES: &[&str] = &["failures", "hits"];

/// Computes the retention cutoff: now minus the retention window, truncated
/// to day granularity, in UTC.
pub fn retention_cutoff(now: DateTime<Utc>) -> NaiveDate {
    now.checked_sub_months(Months::new(RETENTION_MONTHS))
        .unwrap_or(now)
        .date_naive()
}

/// The recurring maintenance task. Runs for the lifetime of the process once
/// started; each tick prunes rows older than the retention window from every
/// swept table. Deletion failures are logged and do not stop subsequent
/// ticks or the sibling table's sweep. Start this at most once.
pub async fn run_retention(pool: AnyPool, backend: Backend) {
    let mut ticker = tokio::time::interval(MAINTENANCE_INTERVAL);
    // The first tick of `interval` completes immediately; consume it so the
    // first sweep happens one full interval after startup.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        tracing::info!(
            "Checking for database records older than {} months...",
            RETENTION_MONTHS
        );
        let cutoff = retention_cutoff(Utc::now());
        for table in SWEPT_TABLES {
            match sweep_table(&pool, backend, table, cutoff).await {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!("Deleted {deleted} row(s) from '{table}'");
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("retention sweep of '{table}' failed: {err}"),
            }
        }
    }
}

/// Deletes all rows from `table` whose creation timestamp is strictly
/// earlier than `cutoff`. The cutoff crosses the SQL boundary as a bound
/// parameter; table names come from the fixed internal list.
pub async fn sweep_table(
    pool: &AnyPool,
    backend: Backend,
    table: &str,
    cutoff: NaiveDate,
) -> Result<u64, DbError> {
    let sql = format!(
        "DELETE FROM {} WHERE created_at < {}",
        table,
        backend.placeholder(1)
    );
    let done = sqlx::query(&sql)
        .bind(cutoff.format(TIME_DAY).to_string())
        .execute(pool)
        .await?;
    Ok(done.rows_affected())
}
