use core_types::Backend;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("failed to connect to the {backend} database: {source}")]
    ConnectionError {
        backend: Backend,
        #[source]
        source: sqlx::Error,
    },

    #[error("no live database session; call connect first")]
    NotConnected,

    #[error("migration of table '{table}' failed: {source}")]
    MigrationError {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    /// Dropping tables is best-effort; every failure is collected so none is
    /// silently superseded by a later one.
    #[error("failed to drop tables: {0:?}")]
    DropError(Vec<(String, String)>),

    #[error("database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("failed to parse stored timestamp '{0}'")]
    TimestampError(String),

    #[error("the requested record was not found in the database")]
    NotFound,
}
