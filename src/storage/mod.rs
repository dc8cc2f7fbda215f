pub mod json_backend;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::domain::Conversation;
use crate::errors::FinanceError;

pub type Result<T> = std::result::Result<T, FinanceError>;

#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
}

/// Abstraction over persistence backends capable of storing conversations.
pub trait StorageBackend: Send + Sync {
    fn save(&self, conversation: &Conversation) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<Conversation>;
    fn load_all(&self) -> Result<Vec<Conversation>>;
    fn delete(&self, name: &str) -> Result<()>;
    fn backup(&self, conversation: &Conversation, note: Option<&str>) -> Result<PathBuf>;
    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Conversation>;
    fn last_active(&self) -> Result<Option<String>>;
    fn record_active(&self, name: Option<&str>) -> Result<()>;
}

pub use json_backend::JsonStorage;
