use std::path::PathBuf;

use tracing::{debug, info};

use crate::ai::AiProvider;
use crate::core::services::ServiceResult;
use crate::core::store::{ApplyOutcome, FinanceStore};
use crate::domain::Conversation;
use crate::errors::FinanceError;
use crate::parser::ParsedCommand;
use crate::storage::{BackupInfo, StorageBackend};
use crate::utils::fs::canonical_name;

/// Facade that coordinates the in-memory store with persistence and backups.
///
/// Committed changes are written through immediately; edits made during a
/// simulation stay in memory until the simulation is committed.
pub struct FinanceManager {
    store: FinanceStore,
    storage: Box<dyn StorageBackend>,
}

impl FinanceManager {
    /// Loads every stored conversation and re-activates the last one used.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self, FinanceError> {
        let conversations = storage.load_all()?;
        let last = storage.last_active()?;
        let loaded = conversations.len();
        let store = FinanceStore::new(conversations, last.as_deref());
        info!(loaded, active = %store.active().name, "conversations loaded");
        Ok(Self { store, storage })
    }

    pub fn store(&self) -> &FinanceStore {
        &self.store
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn active(&self) -> &Conversation {
        self.store.active()
    }

    pub fn active_mut(&mut self) -> &mut Conversation {
        self.store.active_mut()
    }

    /// Persists the committed active conversation; simulated edits are never written.
    pub fn save(&mut self) -> Result<PathBuf, FinanceError> {
        let path = self.storage.save(self.store.committed())?;
        self.storage.record_active(Some(&self.store.committed().name))?;
        Ok(path)
    }

    fn save_unless_simulating(&mut self) -> Result<(), FinanceError> {
        if !self.store.is_simulating() {
            self.save()?;
        }
        Ok(())
    }

    /// Applies a parsed command, saving right away outside a simulation.
    pub fn apply(
        &mut self,
        command: ParsedCommand,
        provider: Option<&dyn AiProvider>,
    ) -> ServiceResult<ApplyOutcome> {
        let outcome = self.store.apply(command, provider)?;
        self.save_unless_simulating()?;
        Ok(outcome)
    }

    /// Runs an edit against the active conversation and persists it like [`Self::apply`].
    pub fn update<T>(
        &mut self,
        edit: impl FnOnce(&mut Conversation) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let value = edit(self.store.active_mut())?;
        self.save_unless_simulating()?;
        Ok(value)
    }

    pub fn create_conversation(&mut self, name: &str) -> Result<PathBuf, FinanceError> {
        self.store.create_conversation(name)?;
        self.save()
    }

    pub fn switch(&mut self, name: &str) -> Result<&Conversation, FinanceError> {
        self.store.switch(name)?;
        self.storage.record_active(Some(&self.store.committed().name))?;
        Ok(self.store.committed())
    }

    /// Renames a conversation and moves its file; backups stay under the old name.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<String, FinanceError> {
        let previous = self.store.rename(name, new_name)?;
        let renamed = self
            .store
            .conversations()
            .iter()
            .find(|conversation| conversation.name == new_name.trim())
            .ok_or_else(|| FinanceError::InvalidRef(new_name.to_string()))?;
        self.storage.save(renamed)?;
        // Case-only renames map onto the file that was just written.
        if canonical_name(&previous) != canonical_name(&renamed.name) {
            self.storage.delete(&previous)?;
        }
        self.storage.record_active(Some(&self.store.committed().name))?;
        debug!(from = %previous, to = new_name, "conversation renamed");
        Ok(previous)
    }

    pub fn delete(&mut self, name: &str) -> Result<Conversation, FinanceError> {
        let removed = self.store.delete(name)?;
        self.storage.delete(&removed.name)?;
        self.storage.record_active(Some(&self.store.committed().name))?;
        Ok(removed)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, FinanceError> {
        self.storage.backup(self.store.committed(), note)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, FinanceError> {
        self.storage.list_backups(&self.store.committed().name)
    }

    /// Restores the active conversation from one of its backups.
    pub fn restore(&mut self, backup_name: &str) -> Result<&Conversation, FinanceError> {
        if self.store.is_simulating() {
            return Err(FinanceError::SimulationActive);
        }
        let name = self.store.committed().name.clone();
        let restored = self.storage.restore(&name, backup_name)?;
        self.store.replace(restored)?;
        info!(conversation = %name, backup = backup_name, "conversation restored");
        Ok(self.store.committed())
    }

    pub fn begin_simulation(&mut self) -> Result<(), FinanceError> {
        self.store.begin_simulation()
    }

    /// Commits the simulated copy and persists it.
    pub fn commit_simulation(&mut self) -> Result<PathBuf, FinanceError> {
        self.store.commit_simulation()?;
        self.save()
    }

    pub fn discard_simulation(&mut self) -> Result<(), FinanceError> {
        self.store.discard_simulation()
    }

    pub fn store_mut(&mut self) -> &mut FinanceStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::storage::JsonStorage;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn manager_in(path: &std::path::Path) -> FinanceManager {
        let storage = JsonStorage::new(Some(path.to_path_buf()), Some(3)).unwrap();
        FinanceManager::open(Box::new(storage)).unwrap()
    }

    #[test]
    fn applied_commands_survive_reopen() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.create_conversation("Household").unwrap();
        manager
            .apply(parse("spent 42.50 on groceries", today()).unwrap(), None)
            .unwrap();
        drop(manager);

        let manager = manager_in(temp.path());
        assert_eq!(manager.active().name, "Household");
        assert_eq!(manager.active().transactions.len(), 1);
    }

    #[test]
    fn simulated_edits_are_not_written_until_commit() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.save().unwrap();
        manager.begin_simulation().unwrap();
        manager
            .apply(parse("spent 900 on a laptop", today()).unwrap(), None)
            .unwrap();
        assert_eq!(manager_in(temp.path()).active().transactions.len(), 0);

        manager.commit_simulation().unwrap();
        assert_eq!(manager_in(temp.path()).active().transactions.len(), 1);
    }

    #[test]
    fn rename_moves_the_file() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.create_conversation("Trip").unwrap();
        manager.rename("Trip", "Japan").unwrap();
        let names: Vec<String> = manager_in(temp.path())
            .store()
            .list()
            .into_iter()
            .map(|summary| summary.name)
            .collect();
        assert!(names.contains(&"Japan".to_string()));
        assert!(!names.contains(&"Trip".to_string()));
    }

    #[test]
    fn case_only_rename_keeps_the_file() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.create_conversation("Trip").unwrap();
        manager
            .apply(parse("spent 10 on coffee", today()).unwrap(), None)
            .unwrap();
        manager.rename("Trip", "TRIP").unwrap();

        let reopened = manager_in(temp.path());
        assert_eq!(reopened.active().name, "TRIP");
        assert_eq!(reopened.active().transactions.len(), 1);
    }

    #[test]
    fn restore_brings_back_backed_up_state() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.save().unwrap();
        let backup = manager.backup(Some("clean")).unwrap();
        manager
            .apply(parse("spent 10 on coffee", today()).unwrap(), None)
            .unwrap();
        assert_eq!(manager.active().transactions.len(), 1);

        let file_name = backup.file_name().and_then(|name| name.to_str()).unwrap();
        manager.restore(file_name).unwrap();
        assert!(manager.active().transactions.is_empty());
        assert!(!manager.list_backups().unwrap().is_empty());
    }
}
