use thiserror::Error;

#[derive(Error, Debug)]
pub enum HiveError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    TomlEncodeError(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HiveError>;
