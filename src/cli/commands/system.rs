use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("finbar {}", meta.version));
    output::info(format!("  Schema ver   : v{}", CURRENT_SCHEMA_VERSION));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let Some(entry) = context.registry.get(&name.to_lowercase()) else {
            context.suggest_command(name);
            return Err(CommandError::NotFound(format!("Unknown command `{}`", name)));
        };
        output::section(format!("Help: {}", entry.name));
        output::info(format!("  Description: {}", entry.description));
        output::info(format!("  Usage: {}", entry.usage));
        return Ok(());
    }

    output::section("Available commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<16} {}", entry.name, entry.description));
    }
    output::section("Command bar");
    for example in [
        "spent 12.50 on lunch",
        "salary 3000",
        "budget food 400",
        "goal Vacation 2000 by 2025-06-01",
        "save 150 for vacation",
        "debt from bank 1200 over 12 months",
        "paid back bank 100",
        "netflix 15.99 every month",
        "use 70/20/10",
    ] {
        output::info(format!("  {}", example));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
