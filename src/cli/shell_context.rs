use std::{env, path::PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    ai::{AiProvider, GenerativeClient},
    config::{Config, ConfigManager},
    core::{Clock, FinanceManager, FixedClock, SystemClock},
    currency::MoneyFormat,
    storage::JsonStorage,
    utils::paths,
};

use super::commands;
use super::core::CliError;
use super::registry::CommandRegistry;

/// Pins "today" to a fixed `YYYY-MM-DD` date, mainly for scripted runs.
pub const TODAY_ENV: &str = "FINBAR_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: FinanceManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub provider: Option<Box<dyn AiProvider>>,
    pub clock: Box<dyn Clock>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, paths::app_data_dir())
    }

    /// Opens every store under `base` and wires the command registry.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let storage = JsonStorage::new(Some(base.clone()), None)?;
        let manager = FinanceManager::open(Box::new(storage))?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let provider = build_provider(&config);
        let mut context = Self {
            mode,
            registry: commands::registry(),
            manager,
            config_manager,
            config,
            provider,
            clock: clock_from_env(),
            last_command: None,
            running: true,
        };
        context.restore_last_conversation();
        Ok(context)
    }

    /// Falls back to the conversation named in the config when no state file recorded one.
    fn restore_last_conversation(&mut self) {
        let Some(name) = self.config.last_conversation.clone() else {
            return;
        };
        if matches!(self.manager.storage().last_active(), Ok(Some(_))) {
            return;
        }
        if let Err(err) = self.manager.switch(&name) {
            debug!(conversation = %name, error = %err, "last conversation unavailable");
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn money(&self) -> MoneyFormat {
        MoneyFormat::from_config(&self.config)
    }

    pub fn provider(&self) -> Option<&dyn AiProvider> {
        self.provider.as_deref()
    }

    /// Rebuilds the AI provider after configuration changes.
    pub fn refresh_provider(&mut self) {
        self.provider = build_provider(&self.config);
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        let name = &self.manager.active().name;
        if self.manager.store().is_simulating() {
            format!("finbar [{} | simulation]> ", name)
        } else {
            format!("finbar [{}]> ", name)
        }
    }
}

fn build_provider(config: &Config) -> Option<Box<dyn AiProvider>> {
    if !config.ai.enabled {
        return None;
    }
    match GenerativeClient::from_settings(&config.ai) {
        Ok(client) => Some(Box::new(client)),
        Err(err) => {
            warn!(error = %err, "AI fallback disabled");
            None
        }
    }
}

fn clock_from_env() -> Box<dyn Clock> {
    let Ok(raw) = env::var(TODAY_ENV) else {
        return Box::new(SystemClock);
    };
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Box::new(FixedClock::new(date)),
        Err(_) => {
            warn!(value = %raw, "ignoring malformed {}", TODAY_ENV);
            Box::new(SystemClock)
        }
    }
}
