//! Error types for blossom

use thiserror::Error;

/// The main error type for blossom operations
#[derive(Debug, Error)]
pub enum BlossomError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Audio error: {0}")]
    AudioError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for blossom operations
pub type Result<T> = std::result::Result<T, BlossomError>;

impl From<toml::de::Error> for BlossomError {
    fn from(err: toml::de::Error) -> Self {
        BlossomError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for BlossomError {
    fn from(err: toml::ser::Error) -> Self {
        BlossomError::TomlSerError(err.to_string())
    }
}
