use crate::error::DbError;
use crate::normalize::Localize;
use chrono::{DateTime, NaiveDateTime, Utc};
use configuration::{CONFIG_FILE, DbConfig, new_api_token};
use core_types::{Backend, CoreSettings, Failure, Hit, TIME_FORMAT};
use sqlx::Row;
use sqlx::any::AnyRow;
use sqlx::AnyPool;

/// High-level data access over the shared session. All reads pass through
/// the timezone normalizer before records are returned; all writes store
/// UTC.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: AnyPool,
    backend: Backend,
    /// The currently configured display timezone, as an offset in hours.
    timezone: f32,
}

impl Repository {
    pub fn new(pool: AnyPool, backend: Backend, timezone: f32) -> Self {
        Self {
            pool,
            backend,
            timezone,
        }
    }

    pub fn set_timezone(&mut self, timezone: f32) {
        self.timezone = timezone;
    }

    fn placeholders(&self, count: usize) -> String {
        (1..=count)
            .map(|n| self.backend.placeholder(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Constructs and inserts the singleton settings record: service
    /// identity from the config, freshly generated credentials, and a
    /// migration marker set to the current unix time. Returns the canonical
    /// stored copy.
    pub async fn insert_core_settings(&self, config: &DbConfig) -> Result<CoreSettings, DbError> {
        let now = Utc::now();
        let stamp = now.format(TIME_FORMAT).to_string();
        let sql = format!(
            "INSERT INTO core (name, description, config, api_key, api_secret, domain, \
             timezone, migration_id, created_at, updated_at) VALUES ({})",
            self.placeholders(10)
        );
        sqlx::query(&sql)
            .bind(&config.project)
            .bind(&config.description)
            .bind(CONFIG_FILE)
            .bind(new_api_token(9))
            .bind(new_api_token(16))
            .bind(&config.domain)
            .bind(config.timezone as f64)
            .bind(now.timestamp())
            .bind(&stamp)
            .bind(&stamp)
            .execute(&self.pool)
            .await?;
        self.select_core_settings().await
    }

    /// Fetches the singleton settings row, localized to the display
    /// timezone.
    pub async fn select_core_settings(&self) -> Result<CoreSettings, DbError> {
        let row = sqlx::query(
            "SELECT name, description, config, api_key, api_secret, domain, timezone, \
             migration_id, created_at, updated_at FROM core",
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        let mut settings = CoreSettings {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            config: row.try_get("config")?,
            api_key: row.try_get("api_key")?,
            api_secret: row.try_get("api_secret")?,
            domain: row.try_get("domain")?,
            timezone: row.try_get::<f64, _>("timezone")? as f32,
            migration_id: row.try_get("migration_id")?,
            created_at: stored_timestamp(&row, "created_at")?.fixed_offset(),
            updated_at: stored_timestamp(&row, "updated_at")?.fixed_offset(),
        };
        settings.localize(self.timezone);
        Ok(settings)
    }

    pub async fn insert_hit(
        &self,
        monitor_id: i64,
        latency: f64,
        created_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let sql = format!(
            "INSERT INTO hits (monitor_id, latency, created_at) VALUES ({})",
            self.placeholders(3)
        );
        sqlx::query(&sql)
            .bind(monitor_id)
            .bind(latency)
            .bind(created_at.format(TIME_FORMAT).to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_failure(
        &self,
        monitor_id: i64,
        issue: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let sql = format!(
            "INSERT INTO failures (monitor_id, issue, created_at) VALUES ({})",
            self.placeholders(3)
        );
        sqlx::query(&sql)
            .bind(monitor_id)
            .bind(issue)
            .bind(created_at.format(TIME_FORMAT).to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn hits_for_monitor(&self, monitor_id: i64) -> Result<Vec<Hit>, DbError> {
        let sql = format!(
            "SELECT id, monitor_id, latency, created_at FROM hits WHERE monitor_id = {} \
             ORDER BY created_at ASC",
            self.backend.placeholder(1)
        );
        let rows = sqlx::query(&sql)
            .bind(monitor_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| {
                let mut hit = Hit {
                    id: row.try_get("id")?,
                    monitor_id: row.try_get("monitor_id")?,
                    latency: row.try_get("latency")?,
                    created_at: stored_timestamp(row, "created_at")?.fixed_offset(),
                };
                hit.localize(self.timezone);
                Ok(hit)
            })
            .collect()
    }

    pub async fn failures_for_monitor(&self, monitor_id: i64) -> Result<Vec<Failure>, DbError> {
        let sql = format!(
            "SELECT id, monitor_id, issue, created_at FROM failures WHERE monitor_id = {} \
             ORDER BY created_at ASC",
            self.backend.placeholder(1)
        );
        let rows = sqlx::query(&sql)
            .bind(monitor_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| {
                let mut failure = Failure {
                    id: row.try_get("id")?,
                    monitor_id: row.try_get("monitor_id")?,
                    issue: row.try_get("issue")?,
                    created_at: stored_timestamp(row, "created_at")?.fixed_offset(),
                };
                failure.localize(self.timezone);
                Ok(failure)
            })
            .collect()
    }

    /// Row count for one of the known tables; table names never come from
    /// user input.
    pub async fn count_rows(&self, table: &str) -> Result<i64, DbError> {
        let sql = format!("SELECT COUNT(*) AS cnt FROM {table}");
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row.try_get("cnt")?)
    }
}

/// Parses a stored `TIME_FORMAT` text column back into a UTC timestamp.
fn stored_timestamp(row: &AnyRow, column: &str) -> Result<DateTime<Utc>, DbError> {
    let raw: String = row.try_get(column)?;
    NaiveDateTime::parse_from_str(&raw, TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| DbError::TimestampError(raw))
}
