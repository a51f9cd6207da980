//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use serde::Serialize;
use shadowops::game::{BaseStats, MapStats, Statistics, Validation};
use shadowops::{
    GameManager, GameStatus, Objective, OperationAnalysis, OperationResult, Resource, ScriptRun,
};
use shadowops::script::CommandOutcome;

/// JSON-serializable status report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonStatus<'a> {
    /// Game id.
    pub(super) id: &'a str,
    /// Top-level status.
    pub(super) status: GameStatus,
    /// Current ledger.
    pub(super) resources: Resource,
    /// Alert level.
    pub(super) alert_level: f64,
    /// Base levels and ceilings.
    pub(super) base: BaseStats,
    /// Objective counts.
    pub(super) map: MapStats,
    /// Operation statistics.
    pub(super) statistics: &'a Statistics,
    /// Every objective.
    pub(super) objectives: &'a [Objective],
}

impl<'a> JsonStatus<'a> {
    /// Build from a manager.
    pub(super) fn from_manager(manager: &'a GameManager) -> Self {
        Self {
            id: &manager.state().id,
            status: manager.status(),
            resources: manager.resources(),
            alert_level: manager.alert_level(),
            base: manager.base_stats(),
            map: manager.map_stats(),
            statistics: manager.statistics(),
            objectives: manager.objectives(),
        }
    }
}

fn cost_or_max(cost: Option<Resource>) -> String {
    cost.map_or_else(|| "max level".to_string(), |c| c.to_string())
}

/// Format the game status as human-readable text.
pub(super) fn format_status(manager: &GameManager) -> String {
    let mut output = String::new();
    let base = manager.base_stats();
    let map = manager.map_stats();
    let stats = manager.statistics();

    let _ = writeln!(output, "Game {} ({})", manager.state().id, manager.status());
    let _ = writeln!(
        output,
        "  Resources: {} (value {})",
        manager.resources(),
        manager.resources().total_value()
    );
    let _ = writeln!(output, "  Capacity:  {}", base.capacity);
    let _ = writeln!(output, "  Alert:     {:.0}%", manager.alert_level() * 100.0);
    let _ = writeln!(
        output,
        "  Storage L{} (next: {}), Barracks L{} (next: {})",
        base.storage_level,
        cost_or_max(base.next_storage_cost),
        base.barracks_level,
        cost_or_max(base.next_barracks_cost),
    );
    let _ = writeln!(
        output,
        "  Operations: {} ({} ok, {} failed, {:.0}% success)\n",
        stats.operations,
        stats.successes,
        stats.failures,
        stats.success_rate() * 100.0
    );

    let _ = writeln!(
        output,
        "  Objectives: {} active, {} captured, {} destroyed",
        map.active, map.captured, map.destroyed
    );
    for objective in manager.objectives() {
        let _ = writeln!(
            output,
            "  #{:<3} {:<10} {:<9} defense {:>3} (+{}) units {:>3} at ({:.0}, {:.0})",
            objective.id,
            objective.kind.name(),
            objective.status.to_string(),
            objective.current_defense,
            objective.defense_bonus,
            objective.current_units,
            objective.position.x,
            objective.position.y,
        );
    }

    output
}

/// Format one resolved operation.
pub(super) fn format_result(result: &OperationResult) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} on #{} ({}): {}",
        result.action,
        result.target.id,
        result.target.kind,
        result.outcome.to_string().to_uppercase()
    );
    let _ = writeln!(
        output,
        "  Strength {:.1} vs {} (p = {:.2})",
        result.player_strength, result.enemy_strength, result.probability
    );
    let _ = writeln!(output, "  Lost:   {}", result.resources_lost);
    let _ = writeln!(output, "  Gained: {}", result.resources_gained);
    output
}

/// Format an operation preview.
pub(super) fn format_preview(analysis: &OperationAnalysis, validation: &Validation) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}: p = {:.2}, predicted {}, risk {}",
        analysis.action, analysis.probability, analysis.predicted_outcome, analysis.risk
    );
    let _ = writeln!(
        output,
        "  Strength {:.1} vs {}",
        analysis.player_strength, analysis.enemy_strength
    );
    let _ = writeln!(output, "  Expected loss: {}", analysis.expected_loss);
    let _ = writeln!(output, "  Expected gain: {}", analysis.expected_gain);
    if validation.is_valid() {
        output.push_str("  Ready to execute\n");
    } else {
        for reason in &validation.reasons {
            let _ = writeln!(output, "  Blocked: {reason}");
        }
    }
    output
}

/// Format a script run.
pub(super) fn format_run(run: &ScriptRun) -> String {
    let mut output = String::new();
    for (i, outcome) in run.outcomes.iter().enumerate() {
        let line = match outcome {
            CommandOutcome::Started => "new game".to_string(),
            CommandOutcome::Resolved { result } => format!(
                "{} on #{}: {} (p = {:.2})",
                result.action, result.target.id, result.outcome, result.probability
            ),
            CommandOutcome::Upgraded { building, level } => format!("{building} -> L{level}"),
            CommandOutcome::Paid { cost } => format!("paid {cost}"),
            CommandOutcome::Toggled { changed } => {
                if *changed {
                    "status toggled".to_string()
                } else {
                    "no-op".to_string()
                }
            }
            CommandOutcome::Rejected { reason } => format!("rejected: {reason}"),
        };
        let _ = writeln!(output, "{:>4}. {line}", i + 1);
    }
    let _ = writeln!(
        output,
        "\nFinal: {} with {} (alert {:.0}%)",
        run.final_state.status,
        run.final_state.resources,
        run.final_state.alert_level * 100.0
    );
    let _ = writeln!(output, "Fingerprint: {:#018x}", run.fingerprint);
    output
}
