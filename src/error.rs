//! Error types for swarmkit.
//!
//! The numeric core never fails once it is running. Errors only come from
//! configuration (bad values, unreadable files) and from driving a swarm
//! whose formation has not been generated yet.

use std::fmt;

/// Errors that can occur while loading or validating a [`SwarmConfig`](crate::SwarmConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// A configuration value is outside its accepted range.
    InvalidValue {
        /// Dotted path of the offending field, e.g. `springs.idle.damping`.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// The configuration file could not be parsed.
    Json(serde_json::Error),
    /// The configuration file could not be read or written.
    Io(std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for `{}`: {}", field, reason)
            }
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Errors that can occur when driving a [`Swarm`](crate::Swarm).
#[derive(Debug)]
pub enum SwarmError {
    /// `tick` or a buffer view was requested before the formation was generated.
    Uninitialized,
    /// The swarm was built from an invalid configuration.
    Config(ConfigError),
}

impl fmt::Display for SwarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwarmError::Uninitialized => write!(
                f,
                "Particle buffer is not initialized. Call generate_formation() before tick()."
            ),
            SwarmError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for SwarmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwarmError::Config(e) => Some(e),
            SwarmError::Uninitialized => None,
        }
    }
}

impl From<ConfigError> for SwarmError {
    fn from(e: ConfigError) -> Self {
        SwarmError::Config(e)
    }
}
