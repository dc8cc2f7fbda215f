use dirs::home_dir;
use std::{env, path::PathBuf};

pub const HOME_ENV: &str = "FINBAR_HOME";

const DEFAULT_DIR_NAME: &str = ".finbar";
const CONVERSATIONS_DIR: &str = "conversations";
const BACKUP_DIR: &str = "backups";
const CONFIG_BACKUP_DIR: &str = "config_backups";
const CONFIG_FILE: &str = "config.json";
const STATE_FILE: &str = "state.json";

/// Returns the application data directory, defaulting to `~/.finbar`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves the data root, preferring an explicit override.
pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(app_data_dir)
}

pub fn conversations_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(CONVERSATIONS_DIR)
}

pub fn backups_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_backups_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_BACKUP_DIR)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Shared state file (tracks the last active conversation).
pub fn state_file_in(base: &std::path::Path) -> PathBuf {
    base.join(STATE_FILE)
}
