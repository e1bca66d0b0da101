//! Thread-local phase tracking.
//!
//! The fixture runner marks the phase it is in so that log lines and panic
//! messages from the coordinating thread can say whether it was spawning,
//! joining or reporting. Worker threads start with no phase.

use std::cell::Cell;
use std::fmt;

thread_local! {
    static CURRENT_PHASE: Cell<Option<FixturePhase>> = const { Cell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixturePhase {
    /// Creating worker threads
    Spawning,
    /// Waiting for worker threads to finish
    Joining,
    /// Rendering outcomes
    Reporting,
}

impl FixturePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spawning => "spawning",
            Self::Joining => "joining",
            Self::Reporting => "reporting",
        }
    }
}

impl fmt::Display for FixturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RAII guard restoring the previous phase on drop.
pub struct PhaseGuard {
    previous: Option<FixturePhase>,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        CURRENT_PHASE.with(|phase| phase.set(self.previous));
    }
}

/// Set the phase for the current thread until the returned guard drops.
#[must_use]
pub fn set_phase(phase: FixturePhase) -> PhaseGuard {
    let previous = CURRENT_PHASE.with(|current| current.replace(Some(phase)));
    PhaseGuard { previous }
}

pub fn current_phase() -> Option<FixturePhase> {
    CURRENT_PHASE.with(Cell::get)
}

/// Current phase as a log field value, `"none"` outside any phase.
pub fn phase_label() -> &'static str {
    current_phase().map_or("none", FixturePhase::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_guard_restores_previous() {
        assert_eq!(current_phase(), None);
        {
            let _outer = set_phase(FixturePhase::Spawning);
            assert_eq!(current_phase(), Some(FixturePhase::Spawning));
            {
                let _inner = set_phase(FixturePhase::Joining);
                assert_eq!(current_phase(), Some(FixturePhase::Joining));
            }
            assert_eq!(current_phase(), Some(FixturePhase::Spawning));
        }
        assert_eq!(current_phase(), None);
    }

    #[test]
    fn test_phase_is_thread_local() {
        let _phase = set_phase(FixturePhase::Reporting);
        let seen = std::thread::spawn(current_phase).join().unwrap();
        assert_eq!(seen, None);
    }

    #[test]
    fn test_phase_label() {
        assert_eq!(phase_label(), "none");
        let _phase = set_phase(FixturePhase::Joining);
        assert_eq!(phase_label(), "joining");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(FixturePhase::Spawning.to_string(), "spawning");
        assert_eq!(FixturePhase::Joining.to_string(), "joining");
        assert_eq!(FixturePhase::Reporting.to_string(), "reporting");
    }
}
