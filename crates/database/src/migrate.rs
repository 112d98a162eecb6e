use crate::error::DbError;
use crate::registry::{CORE_TABLE, MODEL_REGISTRY, TableSpec};
use core_types::Backend;
use sqlx::{AnyConnection, AnyPool};
use sqlx::{Any, Row, Transaction};
use std::collections::HashSet;

fn all_tables() -> impl Iterator<Item = &'static TableSpec> {
    MODEL_REGISTRY.iter().chain(std::iter::once(&CORE_TABLE))
}

fn create_table_sql(backend: Backend, table: &TableSpec) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.ty.sql_type(backend)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", table.name, columns)
}

/// Creates the table for every registry member plus the singleton settings
/// table. Fails fast on the first error; tables created before the failure
/// are left in place.
pub async fn create_schema(pool: &AnyPool, backend: Backend) -> Result<(), DbError> {
    tracing::info!("Creating database tables...");
    for table in all_tables() {
        sqlx::query(&create_table_sql(backend, table))
            .execute(pool)
            .await
            .map_err(|source| DbError::MigrationError {
                table: table.name.to_string(),
                source,
            })?;
    }
    tracing::info!("Database tables created");
    Ok(())
}

/// Evolves the schema additively inside one transaction: missing tables are
/// created, missing columns are added; nothing is dropped, renamed or
/// deleted. On any step error the transaction is rolled back and the error
/// surfaced, so the schema is observed either fully evolved or exactly as it
/// was before the call.
pub async fn migrate_schema(pool: &AnyPool, backend: Backend) -> Result<(), DbError> {
    tracing::info!("Migrating database tables...");
    let mut tx = pool.begin().await?;
    for table in all_tables() {
        if let Err(source) = evolve_table(&mut tx, backend, table).await {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("rollback after failed migration also failed: {rollback_err}");
            }
            tracing::error!("database could not be migrated: {source}");
            return Err(DbError::MigrationError {
                table: table.name.to_string(),
                source,
            });
        }
    }
    tx.commit().await?;
    tracing::info!("Database migrated");
    Ok(())
}

async fn evolve_table(
    tx: &mut Transaction<'_, Any>,
    backend: Backend,
    table: &TableSpec,
) -> Result<(), sqlx::Error> {
    let present = existing_columns(&mut *tx, backend, table.name).await?;
    if present.is_empty() {
        sqlx::query(&create_table_sql(backend, table))
            .execute(&mut **tx)
            .await?;
        return Ok(());
    }
    for column in table.columns {
        if !present.contains(column.name) {
            let sql = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                table.name,
                column.name,
                column.ty.sql_type(backend)
            );
            sqlx::query(&sql).execute(&mut **tx).await?;
        }
    }
    Ok(())
}

/// Returns the column names currently present on `table`, or an empty set if
/// the table does not exist yet.
async fn existing_columns(
    conn: &mut AnyConnection,
    backend: Backend,
    table: &str,
) -> Result<HashSet<String>, sqlx::Error> {
    let sql = match backend {
        Backend::Sqlite => "SELECT name AS column_name FROM pragma_table_info(?)".to_string(),
        Backend::Mysql => "SELECT column_name AS column_name FROM information_schema.columns \
             WHERE table_name = ? AND table_schema = DATABASE()"
            .to_string(),
        Backend::Postgres => {
            "SELECT column_name AS column_name FROM information_schema.columns \
             WHERE table_name = $1"
                .to_string()
        }
        Backend::Mssql => {
            "SELECT column_name AS column_name FROM information_schema.columns \
             WHERE table_name = @p1"
                .to_string()
        }
    };
    let rows = sqlx::query(&sql).bind(table).fetch_all(&mut *conn).await?;
    rows.iter()
        .map(|row| row.try_get::<String, _>("column_name"))
        .collect()
}

/// Drops every known table, children before parents, best-effort: a failed
/// drop does not stop the remaining ones, and every failure is reported.
pub async fn drop_schema(pool: &AnyPool) -> Result<(), DbError> {
    tracing::info!("Dropping database tables...");
    let mut failures: Vec<(String, String)> = Vec::new();
    for table in MODEL_REGISTRY.iter().rev().chain(std::iter::once(&CORE_TABLE)) {
        let sql = format!("DROP TABLE IF EXISTS {}", table.name);
        if let Err(err) = sqlx::query(&sql).execute(pool).await {
            failures.push((table.name.to_string(), err.to_string()));
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(DbError::DropError(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::connect_sqlite;

    async fn table_exists(pool: &AnyPool, name: &str) -> bool {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
            .unwrap();
        row.is_some()
    }

    #[tokio::test]
    async fn create_schema_builds_every_registry_table() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect_sqlite(dir.path()).await;
        let pool = db.session().unwrap();

        create_schema(&pool, Backend::Sqlite).await.unwrap();
        for table in MODEL_REGISTRY {
            assert!(table_exists(&pool, table.name).await, "{} missing", table.name);
        }
        assert!(table_exists(&pool, "core").await);
    }

    #[tokio::test]
    async fn migrate_schema_creates_missing_tables_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect_sqlite(dir.path()).await;
        let pool = db.session().unwrap();

        migrate_schema(&pool, Backend::Sqlite).await.unwrap();
        migrate_schema(&pool, Backend::Sqlite).await.unwrap();
        assert!(table_exists(&pool, "hits").await);
    }

    #[tokio::test]
    async fn migrate_schema_adds_columns_without_touching_data() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect_sqlite(dir.path()).await;
        let pool = db.session().unwrap();

        // An older installation: hits exists but lacks the latency column.
        sqlx::query("CREATE TABLE hits (id INTEGER PRIMARY KEY AUTOINCREMENT, monitor_id BIGINT, created_at TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO hits (monitor_id, created_at) VALUES (1, '2026-01-01 00:00:00')")
            .execute(&pool)
            .await
            .unwrap();

        migrate_schema(&pool, Backend::Sqlite).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let columns = existing_columns(&mut conn, Backend::Sqlite, "hits").await.unwrap();
        assert!(columns.contains("latency"));
        // The sqlite pool holds a single connection; release it before the
        // next pool query or the acquire below deadlocks.
        drop(conn);

        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM hits")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.try_get::<i64, _>("cnt").unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_migration_rolls_back_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect_sqlite(dir.path()).await;
        let pool = db.session().unwrap();

        // A view squatting on the last registry table: its columns are
        // incomplete and ALTER TABLE on a view fails deterministically.
        sqlx::query("CREATE VIEW incident_updates (id) AS SELECT 1")
            .execute(&pool)
            .await
            .unwrap();

        let err = migrate_schema(&pool, Backend::Sqlite).await.unwrap_err();
        assert!(matches!(err, DbError::MigrationError { ref table, .. } if table == "incident_updates"));

        // Tables created earlier in the same transaction must be gone.
        for table in MODEL_REGISTRY.iter().take(MODEL_REGISTRY.len() - 1) {
            assert!(
                !table_exists(&pool, table.name).await,
                "{} survived the rollback",
                table.name
            );
        }
    }

    #[tokio::test]
    async fn drop_schema_reports_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect_sqlite(dir.path()).await;
        let pool = db.session().unwrap();

        create_schema(&pool, Backend::Sqlite).await.unwrap();
        drop_schema(&pool).await.unwrap();
        for table in MODEL_REGISTRY {
            assert!(!table_exists(&pool, table.name).await);
        }

        // Dropping an already-empty schema is fine: DROP TABLE IF EXISTS.
        drop_schema(&pool).await.unwrap();

        // Views make DROP TABLE fail; both failures must be reported.
        sqlx::query("CREATE VIEW hits (id) AS SELECT 1").execute(&pool).await.unwrap();
        sqlx::query("CREATE VIEW core (name) AS SELECT 'x'").execute(&pool).await.unwrap();
        let err = drop_schema(&pool).await.unwrap_err();
        match err {
            DbError::DropError(failures) => {
                let names: Vec<_> = failures.iter().map(|(t, _)| t.as_str()).collect();
                assert!(names.contains(&"hits"));
                assert!(names.contains(&"core"));
            }
            other => panic!("expected DropError, got {other:?}"),
        }
    }
}
