//! Error types for fixture runs.
//!
//! Library code returns [`FixtureError`]; the binary wraps it in
//! `anyhow::Error` with additional context before reporting.
//!
//! # Categories
//!
//! - `Spawn`: the platform refused to create a worker thread
//! - `WorkerPanicked`: a worker thread unwound instead of returning
//! - `Config`: configuration could not be read, parsed or validated
//! - `Inconsistent`: a round finished with a counter other than the expected value

use crate::worker::WorkerId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lock-fixture operations
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Thread creation failed
    #[error("Failed to spawn worker-{slot} ({routine}): {source}")]
    Spawn {
        slot: usize,
        routine: WorkerId,
        #[source]
        source: std::io::Error,
    },

    /// Joining a worker returned a panic payload
    #[error("Worker-{slot} ({routine}) panicked before completing its critical section")]
    WorkerPanicked { slot: usize, routine: WorkerId },

    /// Configuration errors
    #[error("Configuration error{}: {message}", .path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    /// Final counter did not match the number of workers
    #[error("Round {round} finished with counter {counter}, expected {expected}")]
    Inconsistent {
        round: usize,
        counter: u64,
        expected: u64,
    },
}

impl FixtureError {
    /// Create a configuration error without a file location.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            path: None,
            message: message.into(),
        }
    }

    /// Create a configuration error tied to a config file.
    pub fn config_at(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: Some(path.into()),
            message: message.into(),
        }
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, FixtureError>;
