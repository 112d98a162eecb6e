use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod keys;
pub mod persist;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use keys::new_api_token;
pub use persist::{save, update};
pub use settings::{CONFIG_FILE, DbConfig};

/// Loads the application configuration from the `config.yml` artifact in
/// `dir`.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `DbConfig`
/// struct, and returns it.
pub fn load_config(dir: &Path) -> Result<DbConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .build()?;

    // Attempt to deserialize the entire configuration into our `DbConfig` struct
    let config = builder.try_deserialize::<DbConfig>()?;

    Ok(config)
}
