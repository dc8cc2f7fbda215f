use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use chrono::Utc;

use crate::{
    domain::{Conversation, CURRENT_SCHEMA_VERSION},
    errors::FinanceError,
    utils::{
        fs::{
            backup_file_name, canonical_name, ensure_dir, parse_backup_timestamp, write_atomic,
            BACKUP_EXTENSION,
        },
        paths,
    },
};

use super::{BackupInfo, Result, StorageBackend};

const DEFAULT_RETENTION: usize = 5;

/// One pretty-printed JSON file per conversation under `conversations/`.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    conversations_dir: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = paths::resolve_base(root);
        ensure_dir(&app_root)?;
        let conversations_dir = paths::conversations_dir_in(&app_root);
        let backups_dir = paths::backups_dir_in(&app_root);
        ensure_dir(&conversations_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            state_file: paths::state_file_in(&app_root),
            root: app_root,
            conversations_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn conversation_path(&self, name: &str) -> PathBuf {
        self.conversations_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    /// Copies the current file aside before it is overwritten.
    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let backup_path = unique_backup_path(&dir, &canonical_name(name), None);
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(path = %entry.path.display(), error = %err, "could not prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, conversation: &Conversation) -> Result<PathBuf> {
        let path = self.conversation_path(&conversation.name);
        self.backup_existing_file(&conversation.name, &path)?;
        let json = serde_json::to_string_pretty(conversation)?;
        write_atomic(&path, &json)?;
        debug!(path = %path.display(), "conversation saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Conversation> {
        let path = self.conversation_path(name);
        if !path.exists() {
            return Err(FinanceError::Persistence(format!(
                "conversation `{}` not found",
                name
            )));
        }
        load_conversation_from_path(&path)
    }

    fn load_all(&self) -> Result<Vec<Conversation>> {
        let mut conversations = Vec::new();
        for entry in fs::read_dir(&self.conversations_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            conversations.push(load_conversation_from_path(&path)?);
        }
        conversations.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(conversations)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.conversation_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "conversation file removed");
        }
        Ok(())
    }

    fn backup(&self, conversation: &Conversation, note: Option<&str>) -> Result<PathBuf> {
        let dir = self.backup_dir(&conversation.name);
        ensure_dir(&dir)?;
        let path = unique_backup_path(&dir, &canonical_name(&conversation.name), note);
        let json = serde_json::to_string_pretty(conversation)?;
        write_atomic(&path, &json)?;
        self.prune_backups(&conversation.name)?;
        debug!(path = %path.display(), "backup written");
        Ok(path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) else {
                continue;
            };
            entries.push(BackupInfo {
                name: file_name.to_string(),
                created_at: parse_backup_timestamp(file_name, &prefix),
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.name.cmp(&a.name)));
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Conversation> {
        // Only names listed for this conversation resolve, so no path can escape its folder.
        let backup_path = self
            .list_backups(name)?
            .into_iter()
            .find(|backup| backup.name == backup_name.trim())
            .map(|backup| backup.path)
            .ok_or_else(|| {
                FinanceError::Persistence(format!("backup `{}` not found", backup_name))
            })?;
        let data = fs::read_to_string(&backup_path)?;
        let conversation = parse_conversation(&data, &backup_path)?;
        // Pruning below may remove the backup itself, so its content is already in hand.
        let target = self.conversation_path(name);
        self.backup_existing_file(name, &target)?;
        write_atomic(&target, &data)?;
        Ok(conversation)
    }

    fn last_active(&self) -> Result<Option<String>> {
        Ok(self.read_state()?.last_conversation)
    }

    fn record_active(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_conversation = name.map(str::to_string);
        write_atomic(&self.state_file, &serde_json::to_string_pretty(&state)?)
    }
}

/// Timestamped backup path; same-second collisions get a numeric suffix.
fn unique_backup_path(dir: &Path, prefix: &str, note: Option<&str>) -> PathBuf {
    let now = Utc::now();
    let mut path = dir.join(backup_file_name(prefix, now, note));
    let mut attempt = 2;
    while path.exists() {
        let label = format!("{} {}", note.unwrap_or_default(), attempt);
        path = dir.join(backup_file_name(prefix, now, Some(&label)));
        attempt += 1;
    }
    path
}

/// Reads a conversation file, refusing schemas newer than this build understands.
pub fn load_conversation_from_path(path: &Path) -> Result<Conversation> {
    let data = fs::read_to_string(path)?;
    parse_conversation(&data, path)
}

fn parse_conversation(data: &str, path: &Path) -> Result<Conversation> {
    let conversation: Conversation = serde_json::from_str(data)?;
    if conversation.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(FinanceError::Persistence(format!(
            "`{}` uses schema v{}, newer than supported v{}",
            path.display(),
            conversation.schema_version,
            CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(conversation)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_conversation: Option<String>,
}
