#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use finbar_core::core::FinanceManager;
use finbar_core::storage::JsonStorage;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Manager backed by a unique directory, with a backup retention of three.
pub fn setup_manager() -> (FinanceManager, std::path::PathBuf) {
    let base = temp_home();
    (open_manager(&base), base)
}

pub fn open_manager(base: &std::path::Path) -> FinanceManager {
    let storage =
        JsonStorage::new(Some(base.to_path_buf()), Some(3)).expect("create json storage");
    FinanceManager::open(Box::new(storage)).expect("open manager")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
