use thiserror::Error;

/// Top-level error type for Aqari.
#[derive(Debug, Error)]
pub enum BotError {
    /// Error from the messaging transport.
    #[error("channel error: {0}")]
    Channel(String),

    /// Error from the remote offer catalog.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Error from the template provider.
    #[error("template error: {0}")]
    Template(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
