use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Configuration error: invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Embedding request failed: {message}")]
    EmbeddingError { message: String },

    #[error("Snapshot error: {message}")]
    SnapshotError { message: String },
}

pub type Result<T> = std::result::Result<T, FormationError>;
