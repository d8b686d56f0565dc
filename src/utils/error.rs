use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrieverError {
    #[error("Usage error: {message}")]
    UsageError { message: String },

    #[error("HTTP request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Tab-delimited I/O error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache error at {path}: {message}")]
    CacheError { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl RetrieverError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::UsageError {
            message: message.into(),
        }
    }

    /// Usage and configuration problems exit with 2, run-time failures with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UsageError { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => 2,
            _ => 1,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::UsageError { .. })
    }
}

pub type Result<T> = std::result::Result<T, RetrieverError>;
