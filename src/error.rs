//! Error types for MargaNav

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// MargaNav error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anchor map resource missing or unreadable
    #[error("Anchor map error: {0}")]
    AnchorMap(String),

    /// Positioning bridge failure
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// Unknown bridge driver name in configuration
    #[error("Unknown bridge driver: {0}")]
    UnknownDriver(String),

    /// Unknown surface kind in configuration
    #[error("Unknown surface kind: {0}")]
    UnknownSurface(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(format!("TOML parse error: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::AnchorMap(format!("JSON parse error: {}", e))
    }
}
