pub mod config;
pub mod conversation;
pub mod records;
pub mod reports;
pub mod simulation;
pub mod system;

use crate::cli::registry::CommandRegistry;

/// Registry with every shell command, in help order.
pub(crate) fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in system::definitions()
        .into_iter()
        .chain(conversation::definitions())
        .chain(records::definitions())
        .chain(reports::definitions())
        .chain(simulation::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
    registry
}
