use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    #[error("Failed to write configuration artifact: {0}")]
    IoError(#[from] std::io::Error),
}
