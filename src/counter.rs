//! The shared counter and its scoped lock guard.
//!
//! The counter is owned by whoever runs the fixture and lent to each worker
//! by reference. The only way to read or modify it is through a
//! [`CounterGuard`], so every modification happens while the mutex is held.
//! The guard releases the lock when dropped, which includes unwinding out of
//! a panicking worker.
//!
//! Each increment also appends a [`CriticalSection`] record. The record is
//! written inside the same critical section, so the history reflects the
//! order in which workers actually held the lock.

use crate::worker::WorkerId;
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::thread;
use tracing::trace;

/// One pass through the critical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalSection {
    /// Routine that performed the increment
    pub routine: WorkerId,
    /// Name of the OS thread that held the lock, if it had one
    pub thread: Option<String>,
    /// Counter value read after acquiring the lock
    pub observed: u64,
    /// Counter value written before releasing the lock
    pub written: u64,
}

#[derive(Debug, Default)]
struct CounterState {
    value: u64,
    history: Vec<CriticalSection>,
}

/// Integer counter shared between worker threads.
///
/// Starts at zero. Not `Clone`: share it by reference (scoped threads) or
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct SharedCounter {
    state: Mutex<CounterState>,
}

impl SharedCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the lock is held and return a guard for the critical section.
    pub fn lock(&self) -> CounterGuard<'_> {
        let inner = self.state.lock();
        trace!(
            thread = thread::current().name().unwrap_or("<unnamed>"),
            value = inner.value,
            "counter lock acquired"
        );
        CounterGuard { inner }
    }

    /// Current value, read under the lock.
    pub fn value(&self) -> u64 {
        self.state.lock().value
    }

    /// Snapshot of every critical section recorded so far, in lock order.
    pub fn history(&self) -> Vec<CriticalSection> {
        self.state.lock().history.clone()
    }

    /// True when no recorded increment was lost or duplicated.
    pub fn is_serialized(&self) -> bool {
        sections_serialized(&self.state.lock().history)
    }
}

/// Scoped access to the counter. The lock is released on drop.
pub struct CounterGuard<'a> {
    inner: MutexGuard<'a, CounterState>,
}

impl CounterGuard<'_> {
    /// Increment the counter once on behalf of `routine`, returning the new value.
    pub fn increment(&mut self, routine: WorkerId) -> u64 {
        let observed = self.inner.value;
        let written = observed + 1;
        self.inner.value = written;
        self.inner.history.push(CriticalSection {
            routine,
            thread: thread::current().name().map(str::to_owned),
            observed,
            written,
        });
        written
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.inner.value
    }
}

impl Drop for CounterGuard<'_> {
    fn drop(&mut self) {
        trace!(value = self.inner.value, "releasing counter lock");
    }
}

/// Check that a history starting from zero has no lost or repeated updates.
///
/// Every section must have read a distinct value in `0..len` and written its
/// successor.
pub fn sections_serialized(sections: &[CriticalSection]) -> bool {
    let mut observed: Vec<u64> = sections.iter().map(|s| s.observed).collect();
    observed.sort_unstable();

    let distinct_predecessors = observed
        .iter()
        .enumerate()
        .all(|(index, &value)| value == index as u64);

    distinct_predecessors && sections.iter().all(|s| s.written == s.observed + 1)
}
