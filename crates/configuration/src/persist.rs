use crate::error::ConfigError;
use crate::keys::new_api_token;
use crate::settings::{CONFIG_FILE, DbConfig};
use std::fs;
use std::path::Path;

/// First-time setup: generates a fresh API key/secret pair, then writes the
/// full configuration to `config.yml` inside `dir`, overwriting any prior
/// content. Returns the config including the new credentials.
///
/// The write is open-truncate-write; a crash mid-write can leave a truncated
/// artifact.
pub fn save(config: &mut DbConfig, dir: &Path) -> Result<DbConfig, ConfigError> {
    config.api_key = new_api_token(16);
    config.api_secret = new_api_token(16);
    write_artifact(config, dir)?;
    Ok(config.clone())
}

/// Writes the configuration unchanged to `config.yml` inside `dir`,
/// preserving existing credentials. Used for subsequent edits.
pub fn update(config: &DbConfig, dir: &Path) -> Result<(), ConfigError> {
    write_artifact(config, dir)
}

fn write_artifact(config: &DbConfig, dir: &Path) -> Result<(), ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let data = serde_yaml::to_string(config)?;
    if let Err(err) = fs::write(&path, data) {
        tracing::error!("could not write {}: {err}", path.display());
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_config;
    use core_types::Backend;

    fn sample_config() -> DbConfig {
        DbConfig {
            project: "Statushub".to_string(),
            description: "Uptime monitoring".to_string(),
            domain: "https://status.example.com".to_string(),
            backend: Backend::Sqlite,
            host: "localhost".to_string(),
            port: 0,
            user: "".to_string(),
            password: "".to_string(),
            database: "".to_string(),
            api_key: "".to_string(),
            api_secret: "".to_string(),
            timezone: 0.0,
        }
    }

    #[test]
    fn save_generates_fresh_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config();

        let first = save(&mut config, dir.path()).unwrap();
        assert_eq!(first.api_key.len(), 16);
        assert_eq!(first.api_secret.len(), 16);

        let second = save(&mut config, dir.path()).unwrap();
        assert_ne!(first.api_key, second.api_key);
        assert_ne!(first.api_secret, second.api_secret);
    }

    #[test]
    fn update_preserves_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        let saved = save(&mut config, dir.path()).unwrap();

        config.description = "edited".to_string();
        update(&config, dir.path()).unwrap();

        let reloaded = load_config(dir.path()).unwrap();
        assert_eq!(reloaded.api_key, saved.api_key);
        assert_eq!(reloaded.api_secret, saved.api_secret);
        assert_eq!(reloaded.description, "edited");
    }

    #[test]
    fn artifact_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = sample_config();
        config.backend = Backend::Postgres;
        config.host = "db.internal".to_string();
        config.port = 5433;
        config.user = "statushub".to_string();
        config.password = "hunter2".to_string();
        config.database = "statushub".to_string();
        config.timezone = -7.0;
        update(&config, dir.path()).unwrap();

        let reloaded = load_config(dir.path()).unwrap();
        assert_eq!(reloaded.backend, Backend::Postgres);
        assert_eq!(reloaded.host, "db.internal");
        assert_eq!(reloaded.port, 5433);
        assert_eq!(reloaded.user, "statushub");
        assert_eq!(reloaded.password, "hunter2");
        assert_eq!(reloaded.database, "statushub");
        assert_eq!(reloaded.timezone, -7.0);
    }
}
