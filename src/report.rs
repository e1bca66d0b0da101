//! Rendering of fixture outcomes for `--report`.

use crate::fixture::FixtureOutcome;
use crate::observability::phase_label;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One line per round
    Text,
    /// Pretty-printed JSON array of outcomes
    Json,
}

pub fn render(outcomes: &[FixtureOutcome], format: ReportFormat) -> serde_json::Result<String> {
    debug!(phase = %phase_label(), rounds = outcomes.len(), ?format, "rendering report");
    match format {
        ReportFormat::Text => Ok(render_text(outcomes)),
        ReportFormat::Json => serde_json::to_string_pretty(outcomes),
    }
}

fn render_text(outcomes: &[FixtureOutcome]) -> String {
    outcomes
        .iter()
        .map(|outcome| {
            let order = outcome
                .lock_order()
                .iter()
                .map(|id| id.name())
                .collect::<Vec<_>>()
                .join(" -> ");
            format!(
                "round {}: counter={} order=[{}] discarded={} consistent={}\n",
                outcome.round,
                outcome.counter,
                order,
                outcome.discarded,
                outcome.is_consistent()
            )
        })
        .collect()
}
