//! Error types for verse-forge operations.
//!
//! Defines error types for each pipeline subsystem:
//! - Dataset loading
//! - Envelope assembly
//! - Batch file writing
//! - Run configuration
//!
//! Loading, writing and configuration errors abort a run. Assembly errors are
//! scoped to a single record and are accumulated by the runner unless the
//! caller asked to fail fast.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the record store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Dataset file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read dataset '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset '{}' is not a JSON array of records: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while assembling a single batch envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Record at index {index} has no usable id")]
    MissingId { index: usize },
}

/// Errors that can occur while writing the batch artifact.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to open batch file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize envelope '{custom_id}': {source}")]
    Serialize {
        custom_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors that abort a whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
