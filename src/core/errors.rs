//! RVR-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, RoverError>;

/// Top-level error type for Rover Console.
#[derive(Debug, Error)]
pub enum RoverError {
    #[error("[RVR-1001] invalid threshold configuration: {details}")]
    InvalidThresholds { details: String },

    #[error("[RVR-1002] malformed action payload in {context}: {details}")]
    MalformedAction {
        context: &'static str,
        details: String,
    },

    #[error("[RVR-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[RVR-1004] missing template file: {path}")]
    MissingTemplate { path: PathBuf },

    #[error("[RVR-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[RVR-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[RVR-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl RoverError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidThresholds { .. } => "RVR-1001",
            Self::MalformedAction { .. } => "RVR-1002",
            Self::ConfigParse { .. } => "RVR-1003",
            Self::MissingTemplate { .. } => "RVR-1004",
            Self::Serialization { .. } => "RVR-2101",
            Self::Io { .. } => "RVR-3002",
            Self::Runtime { .. } => "RVR-3900",
        }
    }

    /// Whether the operator can fix this by re-entering a configuration.
    #[must_use]
    pub const fn is_reprompt(&self) -> bool {
        matches!(
            self,
            Self::InvalidThresholds { .. } | Self::MalformedAction { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for RoverError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for RoverError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
