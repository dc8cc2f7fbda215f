//! Dispatch, error types, and shell context helpers shared by the commands.

use std::io;

use tracing::debug;

use crate::core::services::ServiceError;
use crate::core::store::ApplyOutcome;
use crate::domain::MonthKey;
use crate::errors::FinanceError;
use crate::parser::{self, ParseError, ParseSource};

use super::output;
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line editor failed: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<FinanceError> for CommandError {
    fn from(err: FinanceError) -> Self {
        CommandError::Service(ServiceError::Finance(err))
    }
}

impl ShellContext {
    /// Routes one input line to a registered command or, failing that, the command bar.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(LoopControl::Continue);
        }
        self.last_command = Some(line.to_string());

        let first = line.split_whitespace().next().unwrap_or_default();
        let command = first.to_lowercase();
        if let Some(entry) = self.registry.get(&command) {
            let tokens = shell_words::split(line)
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
            if entry.accepts(args.len()) {
                let handler = entry.handler;
                return match handler(self, &args) {
                    Ok(()) => Ok(LoopControl::Continue),
                    Err(CommandError::ExitRequested) => {
                        self.running = false;
                        Ok(LoopControl::Exit)
                    }
                    Err(err) => Err(err),
                };
            }
        }

        match self.apply_text(line) {
            Err(CommandError::Parse(ParseError::Unrecognized(text))) => {
                self.suggest_command(first);
                Err(CommandError::Parse(ParseError::Unrecognized(text)))
            }
            other => other.map(|_| LoopControl::Continue),
        }
    }

    /// Parses command-bar text and applies it to the active conversation.
    pub(crate) fn apply_text(&mut self, text: &str) -> Result<ApplyOutcome, CommandError> {
        let today = self.today();
        let command = parser::parse_with_fallback(text, today, self.provider.as_deref())?;
        debug!(action = command.action.name(), "command bar input parsed");
        let outcome = self.manager.apply(command, self.provider.as_deref())?;
        let mut message = outcome.message.clone();
        if outcome.source == ParseSource::Ai {
            message.push_str(" (understood by AI)");
        }
        if outcome.simulated {
            output::success(format!("[simulation] {}", message));
        } else {
            output::success(message);
        }
        Ok(outcome)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        if let Some(name) = self.registry.closest(input) {
            output::hint(format!("Did you mean the `{}` command?", name));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Parse(ParseError::Unrecognized(text)) => {
                output::error(format!("Could not understand `{}`", text));
                output::hint("Try `spent 12 on lunch`, `salary 3000` or type `help`.");
            }
            other => output::error(other),
        }
    }

    /// Persists the configuration, mirroring the active conversation name into it.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config.last_conversation = Some(self.manager.store().committed().name.clone());
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}

/// Month argument (`YYYY-MM`), defaulting to the month containing `today`.
pub(crate) fn parse_month(
    arg: Option<&&str>,
    today: chrono::NaiveDate,
) -> Result<MonthKey, CommandError> {
    match arg {
        Some(raw) => MonthKey::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid month `{}` (use YYYY-MM)", raw))
        }),
        None => Ok(MonthKey::of(today)),
    }
}

pub(crate) fn parse_amount_arg(raw: &str) -> Result<f64, CommandError> {
    parser::parse_amount(raw)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", raw)))
}

#[cfg(test)]
pub(crate) fn process_script(
    base: std::path::PathBuf,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base)?;
    context.clock = Box::new(crate::core::FixedClock::new(
        chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    ));
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(context)
}
