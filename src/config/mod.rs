use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::domain::BudgetRule;
use crate::errors::FinanceError;
use crate::utils::{
    fs::{backup_file_name, ensure_dir, parse_backup_timestamp, write_atomic, BACKUP_EXTENSION},
    paths,
};

const BACKUP_PREFIX: &str = "config";

/// Settings for the hosted generative-AI fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-1.5-flash".into(),
            api_key_env: "FINBAR_AI_KEY".into(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Rule applied to conversations that have none of their own.
    pub default_rule: BudgetRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_conversation: Option<String>,
    pub ai: AiSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_rule: BudgetRule::default(),
            last_conversation: None,
            ai: AiSettings::default(),
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`].
    pub const KEYS: &'static [&'static str] = &[
        "locale",
        "currency",
        "default_rule",
        "ai.enabled",
        "ai.endpoint",
        "ai.model",
        "ai.api_key_env",
        "ai.timeout_secs",
    ];

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FinanceError> {
        let value = value.trim();
        let invalid = |reason: &str| FinanceError::Validation(format!("{key}: {reason}"));
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter currency code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "default_rule" => {
                self.default_rule = BudgetRule::parse(value).map_err(|err| invalid(&err))?
            }
            "ai.enabled" => {
                self.ai.enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid("expected true or false")),
                }
            }
            "ai.endpoint" => self.ai.endpoint = value.to_string(),
            "ai.model" => self.ai.model = value.to_string(),
            "ai.api_key_env" => self.ai.api_key_env = value.to_string(),
            "ai.timeout_secs" => {
                self.ai.timeout_secs = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number of seconds"))?
            }
            _ => {
                return Err(FinanceError::Validation(format!(
                    "unknown setting `{}` (known: {})",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBackupInfo {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, FinanceError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, FinanceError> {
        ensure_dir(&base)?;
        let backups_dir = paths::config_backups_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            backups_dir,
        })
    }

    /// Loads the saved configuration, or defaults when none exists yet.
    pub fn load(&self) -> Result<Config, FinanceError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), FinanceError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, FinanceError> {
        ensure_dir(&self.backups_dir)?;
        let name = backup_file_name(BACKUP_PREFIX, Utc::now(), note);
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        debug!(backup = %name, "configuration backup written");
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, FinanceError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(FinanceError::Persistence(format!(
                "configuration backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<ConfigBackupInfo>, FinanceError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(ConfigBackupInfo {
                    created_at: parse_backup_timestamp(name, BACKUP_PREFIX),
                    name: name.to_string(),
                });
            }
        }
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.name.cmp(&a.name)));
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
