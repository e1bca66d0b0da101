//! Logging setup and run-phase tracking.
//!
//! Install the subscriber once at startup:
//!
//! ```ignore
//! use lock_fixture::observability::init_tracing;
//!
//! fn main() {
//!     init_tracing(0);
//!     // ... run the fixture
//! }
//! ```
//!
//! Track which part of a run is active:
//!
//! ```ignore
//! use lock_fixture::observability::{set_phase, FixturePhase};
//!
//! let _phase = set_phase(FixturePhase::Joining);
//! // phase restored when _phase drops
//! ```

pub mod context;

pub use context::{current_phase, phase_label, set_phase, FixturePhase, PhaseGuard};

use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a default filter directive.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `verbosity`. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(false)
        .try_init();
}
