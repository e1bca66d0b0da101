//! The fixture entry point: spawn two workers, join them, report the count.
//!
//! Workers are scoped threads borrowing a caller-owned [`SharedCounter`].
//! Each is named `worker-<slot>` so that logs and external analysis tools can
//! tell the two slots apart even when both run the same routine.
//!
//! Spawn and join failures are handled according to [`FailurePolicy`]. The
//! default discards them after logging, which keeps the plain
//! create/join/exit shape of the fixture. With `Propagate` the first failure
//! is returned.

use crate::config::{FailurePolicy, FixtureConfig};
use crate::counter::{sections_serialized, CriticalSection, SharedCounter};
use crate::errors::{FixtureError, Result};
use crate::observability::{phase_label, set_phase, FixturePhase};
use crate::worker::{WorkerId, WorkerRoutine};
use serde::Serialize;
use std::thread;
use tracing::{debug, info, info_span, warn};

/// Number of worker threads per round.
pub const WORKER_COUNT: usize = 2;

/// Final counter value of a round in which every worker ran.
pub const EXPECTED_COUNT: u64 = WORKER_COUNT as u64;

/// Observable result of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    pub round: usize,
    /// Counter value after both workers were joined
    pub counter: u64,
    /// Critical sections in the order the lock was taken
    pub sections: Vec<CriticalSection>,
    /// Spawn/join failures dropped under `FailurePolicy::Discard`
    pub discarded: usize,
}

impl FixtureOutcome {
    /// Counter reached [`EXPECTED_COUNT`] through exactly one serialized
    /// critical section per worker.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.counter == EXPECTED_COUNT
            && self.sections.len() == WORKER_COUNT
            && sections_serialized(&self.sections)
    }

    /// Routines in the order they entered the critical section.
    pub fn lock_order(&self) -> Vec<WorkerId> {
        self.sections.iter().map(|s| s.routine).collect()
    }
}

/// Run a single round against `counter`, which should start at zero.
pub fn run(counter: &SharedCounter, config: &FixtureConfig) -> Result<FixtureOutcome> {
    let workers = config
        .binding
        .routines()
        .map(|routine| (routine, routine.routine()));
    run_round(0, counter, workers, config)
}

/// Run `config.rounds` rounds, each with a fresh counter.
pub fn run_rounds(config: &FixtureConfig) -> Result<Vec<FixtureOutcome>> {
    config.validate()?;

    let mut outcomes = Vec::new();
    for round in 0..config.rounds {
        let counter = SharedCounter::new();
        let workers = config
            .binding
            .routines()
            .map(|routine| (routine, routine.routine()));
        outcomes.push(run_round(round, &counter, workers, config)?);
    }

    let consistent = outcomes.iter().filter(|o| o.is_consistent()).count();
    info!(
        rounds = outcomes.len(),
        consistent,
        binding = ?config.binding,
        "fixture finished"
    );
    Ok(outcomes)
}

/// Fail with [`FixtureError::Inconsistent`] on the first round whose counter is off.
pub fn verify(outcomes: &[FixtureOutcome]) -> Result<()> {
    match outcomes.iter().find(|o| !o.is_consistent()) {
        Some(bad) => Err(FixtureError::Inconsistent {
            round: bad.round,
            counter: bad.counter,
            expected: EXPECTED_COUNT,
        }),
        None => Ok(()),
    }
}

pub(crate) fn run_round(
    round: usize,
    counter: &SharedCounter,
    workers: [(WorkerId, WorkerRoutine); WORKER_COUNT],
    config: &FixtureConfig,
) -> Result<FixtureOutcome> {
    let span = info_span!("round", round);
    let _enter = span.enter();

    let failures = thread::scope(|scope| {
        let mut failures = Vec::new();
        let mut handles = Vec::with_capacity(WORKER_COUNT);

        {
            let _phase = set_phase(FixturePhase::Spawning);
            for (slot, (routine, entry)) in workers.into_iter().enumerate() {
                let mut builder = thread::Builder::new().name(format!("worker-{slot}"));
                if let Some(size) = config.stack_size {
                    builder = builder.stack_size(size);
                }
                match builder.spawn_scoped(scope, move || entry(counter)) {
                    Ok(handle) => {
                        debug!(slot, %routine, "spawned worker");
                        handles.push((slot, routine, handle));
                    }
                    Err(source) => record_failure(
                        &mut failures,
                        FixtureError::Spawn {
                            slot,
                            routine,
                            source,
                        },
                    ),
                }
            }
        }

        let _phase = set_phase(FixturePhase::Joining);
        for (slot, routine, handle) in handles {
            if handle.join().is_err() {
                record_failure(&mut failures, FixtureError::WorkerPanicked { slot, routine });
            }
        }
        failures
    });

    let discarded = match config.failure_policy {
        FailurePolicy::Propagate => {
            if let Some(first) = failures.into_iter().next() {
                return Err(first);
            }
            0
        }
        FailurePolicy::Discard => {
            if !failures.is_empty() {
                warn!(count = failures.len(), "discarding worker failures");
            }
            failures.len()
        }
    };

    let outcome = FixtureOutcome {
        round,
        counter: counter.value(),
        sections: counter.history(),
        discarded,
    };
    debug!(counter = outcome.counter, order = ?outcome.lock_order(), "round complete");
    Ok(outcome)
}

fn record_failure(failures: &mut Vec<FixtureError>, failure: FixtureError) {
    warn!(phase = %phase_label(), "{failure}");
    failures.push(failure);
}
