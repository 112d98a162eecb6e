use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The relational backends the service can persist to.
///
/// `Sqlite` is the embedded file database used for single-node deployments;
/// the remaining variants are networked SQL servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Mysql,
    Postgres,
    Mssql,
}

impl Backend {
    /// Returns the default network port for this backend. The embedded
    /// database has no network port and returns 0.
    pub fn default_port(&self) -> u16 {
        match self {
            Backend::Sqlite => 0,
            Backend::Mysql => 3306,
            Backend::Postgres => 5432,
            Backend::Mssql => 1433,
        }
    }

    /// The identifier used in the config artifact and in log messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Mysql => "mysql",
            Backend::Postgres => "postgres",
            Backend::Mssql => "mssql",
        }
    }

    /// Returns the positional bind marker for parameter `n` (1-based) in this
    /// backend's SQL dialect. The `Any` driver passes SQL through verbatim,
    /// so statements built at runtime must use the dialect's own markers.
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Backend::Sqlite | Backend::Mysql => "?".to_string(),
            Backend::Postgres => format!("${n}"),
            Backend::Mssql => format!("@p{n}"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Backend::Sqlite),
            "mysql" => Ok(Backend::Mysql),
            "postgres" => Ok(Backend::Postgres),
            "mssql" => Ok(Backend::Mssql),
            other => Err(CoreError::UnknownBackend(other.to_string())),
        }
    }
}
