use crate::config::{ConfigOverrides, FailurePolicy, WorkerBinding};
use crate::report::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lock-fixture")]
#[command(about = "Spawn two workers that increment a shared counter under a lock", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the nearest .lock-fixture.toml)
    #[arg(short, long, env = "LOCK_FIXTURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Which routine each worker slot runs
    #[arg(long, value_enum)]
    pub binding: Option<WorkerBinding>,

    /// Number of independent rounds
    #[arg(long)]
    pub rounds: Option<usize>,

    /// What to do with spawn/join failures (overrides the config file)
    #[arg(long, value_enum)]
    pub failure_policy: Option<FailurePolicy>,

    /// Shorthand for --failure-policy propagate
    #[arg(long, conflicts_with = "failure_policy")]
    pub strict: bool,

    /// Stack size in bytes for worker threads
    #[arg(long)]
    pub stack_size: Option<usize>,

    /// Print outcomes after the run (silent by default)
    #[arg(long, value_enum)]
    pub report: Option<ReportFormat>,

    /// Exit with an error if any round does not end at 2
    #[arg(long)]
    pub check: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            binding: self.binding,
            failure_policy: self
                .failure_policy
                .or(self.strict.then_some(FailurePolicy::Propagate)),
            rounds: self.rounds,
            stack_size: self.stack_size,
        }
    }
}
