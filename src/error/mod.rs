//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error types for trace pipeline configuration translation
//!
//! This module provides the error type shared by the instance set validator,
//! the pipeline translator, and the configuration loader.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loader stage that produced a schema error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Flattening the pipeline graph into a structural mapping
    Merge,

    /// Resolving and validating component types against the registry
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Merge => write!(f, "merge"),
            Stage::Load => write!(f, "load"),
        }
    }
}

/// Main error type for configuration translation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Structural errors: missing or duplicate names, missing required
    /// fields, unsupported enum values
    #[error("configuration error: {message}")]
    Structural {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// File read errors, credential files in particular
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Errors produced while merging or loading the assembled pipeline graph
    #[error("failed to {stage} configuration: {message}")]
    Schema {
        stage: Stage,
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ConfigError {
    /// Create a structural error
    pub fn structural(message: impl Into<String>) -> Self {
        ConfigError::Structural {
            message: message.into(),
            source: None,
        }
    }

    /// Create a structural error with source
    pub fn structural_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        ConfigError::Structural {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error for an unreadable file
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        ConfigError::Io { path, source }
    }

    /// Create a schema error for the given loader stage
    pub fn schema(stage: Stage, message: impl Into<String>) -> Self {
        ConfigError::Schema {
            stage,
            message: message.into(),
            source: None,
        }
    }

    /// Create a schema error with source
    pub fn schema_with_source(
        stage: Stage,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        ConfigError::Schema {
            stage,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            ConfigError::Structural { .. } => "Structural",
            ConfigError::Io { .. } => "Io",
            ConfigError::Schema { .. } => "Schema",
        }
    }

    /// Get the loader stage for schema errors
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ConfigError::Schema { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Check if the error was detected locally, before the loader ran
    pub fn is_structural(&self) -> bool {
        matches!(self, ConfigError::Structural { .. })
    }
}
