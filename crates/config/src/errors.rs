use thiserror::Error;

/// Failures while creating, migrating or reading the dashboard config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Config file could not be edited: {0}")]
    TomlEditError(#[from] toml_edit::TomlError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config migration failed: {0}")]
    MigrationError(String),
}
