use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>|backup [note]|backups|restore <name>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first().map(|value| value.to_lowercase()) else {
        return show(context);
    };
    match action.as_str() {
        "show" => show(context),
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <key> <value> (keys: {})",
                    Config::KEYS.join(", ")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.config.set(key, value.trim())?;
            context.persist_config()?;
            if key.starts_with("ai.") {
                context.refresh_provider();
            }
            output::success(format!("{} updated.", key));
            Ok(())
        }
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            output::success(format!("Configuration backed up as {}", name));
            Ok(())
        }
        "backups" => {
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                output::info("No configuration backups.");
                return Ok(());
            }
            for backup in backups {
                let created = backup
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default();
                output::info(format!("  {}  {}", backup.name, created));
            }
            Ok(())
        }
        "restore" => {
            let Some(name) = args.get(1) else {
                return Err(CommandError::InvalidArguments(
                    "usage: config restore <name>".into(),
                ));
            };
            context.config = context.config_manager.restore(name)?;
            context.refresh_provider();
            output::success(format!("Configuration restored from {}", name));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  locale          : {}", config.locale));
    output::info(format!("  currency        : {}", config.currency));
    output::info(format!("  default_rule    : {}", config.default_rule.name));
    output::info(format!("  ai.enabled      : {}", config.ai.enabled));
    output::info(format!("  ai.endpoint     : {}", config.ai.endpoint));
    output::info(format!("  ai.model        : {}", config.ai.model));
    output::info(format!("  ai.api_key_env  : {}", config.ai.api_key_env));
    output::info(format!("  ai.timeout_secs : {}", config.ai.timeout_secs));
    output::hint(format!("file: {}", context.config_manager.path().display()));
    Ok(())
}
