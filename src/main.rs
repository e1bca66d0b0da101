use anyhow::{Context, Result};
use clap::Parser;
use lock_fixture::cli::Cli;
use lock_fixture::config::{load_config, load_config_from, FixtureConfig};
use lock_fixture::fixture;
use lock_fixture::observability::{init_tracing, set_phase, FixturePhase};
use lock_fixture::report;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    config.validate().context("Invalid fixture configuration")?;

    let outcomes = fixture::run_rounds(&config).context("Fixture run failed")?;

    if let Some(format) = cli.report {
        let _phase = set_phase(FixturePhase::Reporting);
        let rendered = report::render(&outcomes, format).context("Failed to render report")?;
        print!("{rendered}");
    }

    if cli.check {
        fixture::verify(&outcomes).context("Counter check failed")?;
    }

    Ok(())
}

// Explicit path must load; otherwise fall back to discovery and defaults
fn resolve_config(cli: &Cli) -> Result<FixtureConfig> {
    let base = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_config(),
    };
    Ok(base.with_overrides(&cli.overrides()))
}
