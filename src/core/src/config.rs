//! Deployment configuration loading and validation
//!
//! Template loading needs to know which environment it serves and where
//! the environment directories live. Both are carried by
//! [`DeploymentConfig`], read from a TOML file and/or the process
//! environment:
//!
//! ```toml
//! [deployment]
//! environment = "development"
//! storage_root = "/var/lib/mithlond"
//! ```
//!
//! Environment variables:
//! - `MITHLOND_ENVIRONMENT` - deployment environment name
//! - `MITHLOND_STORAGE_ROOT` - root directory holding one directory per environment

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Environment variable naming the deployment environment
pub const ENVIRONMENT_VAR: &str = "MITHLOND_ENVIRONMENT";

/// Environment variable naming the storage root directory
pub const STORAGE_ROOT_VAR: &str = "MITHLOND_STORAGE_ROOT";

/// On-disk layout of the configuration file
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ConfigFile {
    deployment: DeploymentConfig,
}

/// Deployment-wide settings handed to template loading at startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeploymentConfig {
    /// Environment name (e.g. "development", "staging", "production")
    pub environment: String,

    /// Directory holding one subdirectory per environment
    pub storage_root: PathBuf,
}

impl DeploymentConfig {
    /// Create a configuration from explicit values
    pub fn new(environment: impl Into<String>, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            environment: environment.into(),
            storage_root: storage_root.into(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CoreError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: ConfigFile = toml::from_str(&contents)?;
        tracing::debug!(
            "Loaded deployment config from {} (environment={})",
            path.display(),
            file.deployment.environment
        );
        Ok(file.deployment)
    }

    /// Build configuration from `MITHLOND_ENVIRONMENT` and `MITHLOND_STORAGE_ROOT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Override file values with any environment variables that are set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(ENVIRONMENT_VAR)
            .ok_or_else(|| CoreError::configuration(format!("{} is not set", ENVIRONMENT_VAR)))?;
        let storage_root = lookup(STORAGE_ROOT_VAR)
            .ok_or_else(|| CoreError::configuration(format!("{} is not set", STORAGE_ROOT_VAR)))?;

        Ok(Self::new(environment, storage_root))
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(environment) = lookup(ENVIRONMENT_VAR) {
            self.environment = environment;
        }
        if let Some(root) = lookup(STORAGE_ROOT_VAR) {
            self.storage_root = PathBuf::from(root);
        }
        self
    }

    /// Validate the configuration against the filesystem
    ///
    /// The environment name must be non-empty and
    /// `storage_root/environment` must be an existing directory.
    pub fn validate(&self) -> Result<()> {
        if self.environment.trim().is_empty() {
            return Err(CoreError::configuration("Deployment environment name cannot be empty"));
        }

        if !self.storage_root.is_dir() {
            return Err(CoreError::configuration(format!(
                "Storage root [{}] must be an existing directory",
                self.storage_root.display()
            )));
        }

        let environment_root = self.environment_root();
        if !environment_root.is_dir() {
            return Err(CoreError::configuration(format!(
                "Environment storage directory [{}] must be an existing directory. \
                 Please create it and restart the application.",
                environment_root.display()
            )));
        }

        Ok(())
    }

    /// Directory holding this environment's per-organisation data
    pub fn environment_root(&self) -> PathBuf {
        self.storage_root.join(&self.environment)
    }
}
