//! File helpers shared by conversation storage and the config manager.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::FinanceError;

pub const BACKUP_EXTENSION: &str = "json";
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";

pub fn ensure_dir(path: &Path) -> Result<(), FinanceError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), FinanceError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Lowercase slug of letters, digits and `_`, used for file names.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "conversation".into()
    } else {
        sanitized
    }
}

/// Turns a free-form backup note into a dash-separated label.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Backup file stem: `<prefix>_<yyyymmdd>_<hhmmss>[_<note>]`.
pub fn backup_file_name(prefix: &str, at: DateTime<Utc>, note: Option<&str>) -> String {
    let mut stem = format!("{}_{}", prefix, at.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(label) = sanitize_note(note) {
        stem.push('_');
        stem.push_str(&label);
    }
    format!("{}.{}", stem, BACKUP_EXTENSION)
}

/// Recovers the timestamp embedded by [`backup_file_name`].
pub fn parse_backup_timestamp(name: &str, prefix: &str) -> Option<DateTime<Utc>> {
    let rest = name
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?
        .strip_prefix(prefix)?
        .strip_prefix('_')?;
    let mut parts = rest.splitn(3, '_');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{}{}", date_part, time_part), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
