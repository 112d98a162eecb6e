use core_types::Backend;
use serde::{Deserialize, Serialize};

/// The name of the persisted config artifact, relative to the data directory.
pub const CONFIG_FILE: &str = "config.yml";

/// The root configuration structure for the entire application, persisted as
/// `config.yml`. Connection fields are immutable once a session is open;
/// credentials are (re)generated by [`crate::persist`] on first-time setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Human-readable project name shown on the status page.
    pub project: String,
    pub description: String,
    /// The public domain this instance is served from.
    pub domain: String,

    /// Which relational backend to persist to.
    pub backend: Backend,
    pub host: String,
    /// Network port; 0 means "use the backend's default port".
    #[serde(default)]
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name, or ignored for the embedded file backend.
    pub database: String,

    /// Generated on first-time setup; preserved by updates.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,

    /// Display timezone as a UTC offset in hours (e.g. -7.0, 5.5).
    /// Stored values are always UTC; this only affects the read path.
    #[serde(default)]
    pub timezone: f32,
}

impl DbConfig {
    /// Returns the port to connect on, substituting the backend default when
    /// the configured port is the zero value.
    pub fn resolved_port(&self) -> u16 {
        if self.port == 0 {
            self.backend.default_port()
        } else {
            self.port
        }
    }
}
