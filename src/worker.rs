//! Worker routines.
//!
//! `Thread1` and `Thread2` do the same thing: take the counter lock, add one,
//! let the guard drop. They exist as two separate functions so that tools
//! inspecting the binary see two distinct call sites for the critical section.

use crate::counter::SharedCounter;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Signature shared by both routines.
pub type WorkerRoutine = fn(&SharedCounter);

/// Identity of a worker routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorkerId {
    Thread1,
    Thread2,
}

impl WorkerId {
    pub const ALL: [WorkerId; 2] = [WorkerId::Thread1, WorkerId::Thread2];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thread1 => "Thread1",
            Self::Thread2 => "Thread2",
        }
    }

    /// Function pointer for this routine.
    #[must_use]
    pub fn routine(self) -> WorkerRoutine {
        match self {
            Self::Thread1 => thread1,
            Self::Thread2 => thread2,
        }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline(never)]
pub fn thread1(counter: &SharedCounter) {
    let mut guard = counter.lock();
    let value = guard.increment(WorkerId::Thread1);
    debug!(routine = "Thread1", value, "incremented shared counter");
}

#[inline(never)]
pub fn thread2(counter: &SharedCounter) {
    let mut guard = counter.lock();
    let value = guard.increment(WorkerId::Thread2);
    debug!(routine = "Thread2", value, "incremented shared counter");
}
