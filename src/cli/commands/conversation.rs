use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "conversation",
            "Create, switch, list, rename or delete conversations",
            "conversation [list|new <name>|switch <name>|rename <old> <new>|delete <name>]",
            cmd_conversation,
        ),
        CommandEntry::new(
            "save",
            "Write the active conversation to disk",
            "save",
            cmd_save,
        )
        .bare(),
        CommandEntry::new(
            "backup",
            "Back up, list or restore the active conversation",
            "backup [note] | backup list | backup restore <name>",
            cmd_backup,
        ),
    ]
}

fn usage() -> CommandError {
    CommandError::InvalidArguments(
        "usage: conversation [list|new <name>|switch <name>|rename <old> <new>|delete <name>]"
            .into(),
    )
}

fn cmd_conversation(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return list(context);
    };
    let rest = &args[1..];
    match (action.to_lowercase().as_str(), rest) {
        ("list", []) => list(context),
        ("new", [_, ..]) => {
            let name = rest.join(" ");
            context.manager.create_conversation(&name)?;
            context.persist_config()?;
            output::success(format!("Conversation `{}` created and active.", name.trim()));
            Ok(())
        }
        ("switch", [_, ..]) => {
            let name = rest.join(" ");
            let active = context.manager.switch(&name)?.name.clone();
            context.persist_config()?;
            output::success(format!("Switched to `{}`.", active));
            Ok(())
        }
        ("rename", [old, new]) => {
            context.manager.rename(old, new)?;
            context.persist_config()?;
            output::success(format!("Renamed `{}` to `{}`.", old, new));
            Ok(())
        }
        ("delete", [_, ..]) => {
            let name = rest.join(" ");
            let removed = context.manager.delete(&name)?;
            context.persist_config()?;
            output::success(format!(
                "Deleted `{}`. Active conversation: `{}`.",
                removed.name,
                context.manager.active().name
            ));
            Ok(())
        }
        _ => Err(usage()),
    }
}

fn list(context: &ShellContext) -> CommandResult {
    output::section("Conversations");
    let rows: Vec<Vec<String>> = context
        .manager
        .store()
        .list()
        .into_iter()
        .map(|summary| {
            vec![
                if summary.active { "*".into() } else { String::new() },
                summary.name,
                summary.entries.to_string(),
            ]
        })
        .collect();
    output::table(&["", "Name", "Entries"], &rows);
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let path = context.manager.save()?;
    if context.manager.store().is_simulating() {
        output::warning("Simulated changes are not saved until `simulate commit`.");
    }
    output::success(format!("Saved to {}", path.display()));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [action] if action.eq_ignore_ascii_case("list") => {
            let backups = context.manager.list_backups()?;
            if backups.is_empty() {
                output::info("No backups yet.");
                return Ok(());
            }
            output::section(format!("Backups of {}", context.manager.active().name));
            let rows: Vec<Vec<String>> = backups
                .into_iter()
                .map(|backup| {
                    vec![
                        backup.name,
                        backup
                            .created_at
                            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                            .unwrap_or_default(),
                    ]
                })
                .collect();
            output::table(&["Name", "Created"], &rows);
            Ok(())
        }
        [action, name] if action.eq_ignore_ascii_case("restore") => {
            let restored = context.manager.restore(name)?;
            output::success(format!(
                "Restored `{}` ({} entries).",
                restored.name,
                restored.transactions.len()
            ));
            Ok(())
        }
        [action, ..] if action.eq_ignore_ascii_case("restore") => Err(
            CommandError::InvalidArguments("usage: backup restore <name>".into()),
        ),
        _ => {
            let note = (!args.is_empty()).then(|| args.join(" "));
            let path = context.manager.backup(note.as_deref())?;
            output::success(format!("Backup written to {}", path.display()));
            Ok(())
        }
    }
}
