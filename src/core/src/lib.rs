//! # Mithlond Core
//!
//! Shared error handling, deployment configuration and tracing setup for
//! the Mithlond services. Nothing in here holds global mutable state; the
//! deployment configuration is an explicit value handed to whichever
//! component needs it at startup.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types
pub use config::DeploymentConfig;
pub use error::{CoreError, Result};
