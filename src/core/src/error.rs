//! Unified error types for the Mithlond services
//!
//! Subsystem crates define their own error enums and convert from
//! [`CoreError`] where they depend on the shared infrastructure.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the Mithlond services
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        CoreError::Configuration(msg.into())
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CoreError::Serialization(msg.into())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
