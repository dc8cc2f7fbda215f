use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// When set, a line naming this command with arguments is command-bar text instead.
    pub bare_only: bool,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            bare_only: false,
        }
    }

    pub const fn bare(mut self) -> Self {
        self.bare_only = true;
        self
    }

    /// Whether a line starting with this command and carrying `arg_count` arguments belongs to it.
    pub fn accepts(&self, arg_count: usize) -> bool {
        !self.bare_only || arg_count == 0
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Closest command name within two edits of `input`, for "did you mean" hints.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| (1..=2).contains(distance))
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::CommandResult;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn bare_commands_reject_arguments() {
        let entry = CommandEntry::new("save", "", "save", noop).bare();
        assert!(entry.accepts(0));
        assert!(!entry.accepts(3));
        assert!(CommandEntry::new("report", "", "report", noop).accepts(1));
    }

    #[test]
    fn closest_name_ignores_exact_and_distant_input() {
        let mut registry = CommandRegistry::new();
        for name in ["report", "recurring", "help"] {
            registry.register(CommandEntry::new(name, "", name, noop));
        }
        assert_eq!(registry.closest("reprot"), Some("report"));
        assert_eq!(registry.closest("HELPP"), Some("help"));
        assert_eq!(registry.closest("help"), None);
        assert_eq!(registry.closest("spent 12 on lunch"), None);
        assert_eq!(registry.list().len(), 3);
    }
}
