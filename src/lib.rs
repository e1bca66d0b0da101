//! Two-thread locked counter fixture.
//!
//! Two worker routines, `Thread1` and `Thread2`, each take a lock, increment a
//! shared counter once and release the lock. The entry point spawns one
//! thread per routine and joins both. With correct mutual exclusion the
//! counter ends at 2 under every scheduling.
//!
//! ```rust
//! use lock_fixture::{fixture, FixtureConfig, SharedCounter};
//!
//! let counter = SharedCounter::new();
//! let outcome = fixture::run(&counter, &FixtureConfig::default()).unwrap();
//! assert_eq!(outcome.counter, 2);
//! ```

pub mod cli;
pub mod config;
pub mod counter;
pub mod errors;
pub mod fixture;
pub mod observability;
pub mod report;
pub mod worker;

pub use crate::config::{ConfigOverrides, FailurePolicy, FixtureConfig, WorkerBinding};
pub use crate::counter::{CounterGuard, CriticalSection, SharedCounter};
pub use crate::errors::FixtureError;
pub use crate::fixture::{FixtureOutcome, EXPECTED_COUNT, WORKER_COUNT};
pub use crate::worker::{thread1, thread2, WorkerId, WorkerRoutine};
