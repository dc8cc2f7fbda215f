use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::MonthKey;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "simulate",
        "Try what-if changes on a copy of the active conversation",
        "simulate begin|status|commit|discard",
        cmd_simulate,
    )]
}

fn cmd_simulate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = args.first().map(|value| value.to_lowercase());
    match action.as_deref() {
        Some("begin") | Some("start") => {
            context.manager.begin_simulation()?;
            output::success(
                "Simulation started. Changes stay in a copy until `simulate commit`.",
            );
            Ok(())
        }
        Some("status") | None => show_status(context),
        Some("commit") => {
            context.manager.commit_simulation()?;
            output::success("Simulation committed and saved.");
            Ok(())
        }
        Some("discard") => {
            context.manager.discard_simulation()?;
            output::success("Simulation discarded.");
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown simulate action `{}` (use begin, status, commit or discard)",
            other
        ))),
    }
}

fn show_status(context: &ShellContext) -> CommandResult {
    let store = context.manager.store();
    let Some(status) = store.simulation_status() else {
        output::info("No simulation running. Start one with `simulate begin`.");
        return Ok(());
    };
    let money = context.money();
    let impact = store.simulation_impact(MonthKey::of(context.today()))?;
    output::section(format!(
        "Simulation on {} (since {})",
        status.conversation,
        status.started_at.format("%H:%M:%S")
    ));
    let row = |label: &str, base: f64, simulated: f64| {
        vec![
            label.to_string(),
            money.format(base),
            money.format(simulated),
            money.format(simulated - base),
        ]
    };
    let rows = vec![
        row("Income", impact.base.income, impact.simulated.income),
        row("Expenses", impact.base.expenses, impact.simulated.expenses),
        row("Net", impact.base.net, impact.simulated.net),
        row(
            "Goal savings",
            impact.base.goal_savings,
            impact.simulated.goal_savings,
        ),
        row(
            "Debt owed",
            impact.base.outstanding_debt,
            impact.simulated.outstanding_debt,
        ),
    ];
    output::table(
        &[&impact.month.to_string(), "Current", "Simulated", "Change"],
        &rows,
    );
    Ok(())
}
