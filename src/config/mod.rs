//! Fixture configuration.
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. Built-in defaults (distinct routines, discard failures, one round)
//! 2. A `.lock-fixture.toml` file, either passed explicitly or discovered by
//!    walking up from the current directory
//! 3. Command-line flags, applied through [`ConfigOverrides`]
//!
//! ```toml
//! binding = "shared"
//! failure_policy = "propagate"
//! rounds = 100
//! stack_size = 65536
//! ```

pub mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_dir, parse_config,
    CONFIG_FILE_NAME,
};

use crate::errors::{FixtureError, Result};
use crate::fixture::WORKER_COUNT;
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

/// Which routine each worker slot runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WorkerBinding {
    /// Slot 0 runs Thread1, slot 1 runs Thread2
    #[default]
    Distinct,
    /// Both slots run Thread1
    Shared,
}

impl WorkerBinding {
    /// Routine for each slot, in spawn order.
    #[must_use]
    pub const fn routines(self) -> [WorkerId; WORKER_COUNT] {
        match self {
            Self::Distinct => [WorkerId::Thread1, WorkerId::Thread2],
            Self::Shared => [WorkerId::Thread1, WorkerId::Thread1],
        }
    }
}

/// What to do when a worker cannot be spawned or joined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and carry on
    #[default]
    Discard,
    /// Return the first failure to the caller
    Propagate,
}

/// Upper bound on `rounds`; each round spawns two OS threads.
pub const MAX_ROUNDS: usize = 1_000_000;

fn default_rounds() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    #[serde(default)]
    pub binding: WorkerBinding,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Independent runs, each against a fresh counter (default: 1)
    #[serde(default = "default_rounds")]
    pub rounds: usize,

    /// Stack size in bytes for worker threads (default: platform default)
    #[serde(default)]
    pub stack_size: Option<usize>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            binding: WorkerBinding::default(),
            failure_policy: FailurePolicy::default(),
            rounds: default_rounds(),
            stack_size: None,
        }
    }
}

impl FixtureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(FixtureError::config("rounds must be at least 1"));
        }
        if self.rounds > MAX_ROUNDS {
            return Err(FixtureError::config(format!(
                "rounds must be at most {MAX_ROUNDS}, got {}",
                self.rounds
            )));
        }
        if self.stack_size == Some(0) {
            return Err(FixtureError::config("stack_size must be greater than 0"));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(self, overrides: &ConfigOverrides) -> Self {
        Self {
            binding: overrides.binding.unwrap_or(self.binding),
            failure_policy: overrides.failure_policy.unwrap_or(self.failure_policy),
            rounds: overrides.rounds.unwrap_or(self.rounds),
            stack_size: overrides.stack_size.or(self.stack_size),
        }
    }
}

/// Values supplied on the command line. `None` keeps the file or default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub binding: Option<WorkerBinding>,
    pub failure_policy: Option<FailurePolicy>,
    pub rounds: Option<usize>,
    pub stack_size: Option<usize>,
}
