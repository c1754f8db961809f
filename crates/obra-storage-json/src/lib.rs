//! Filesystem JSON persistence for ledger snapshots.
//!
//! The whole ledger travels as one JSON blob (the same payload the
//! remote sync row carries). Writes go through a temp file and a rename;
//! every overwrite first copies the previous blob into a timestamped
//! backup, pruned to a retention count.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::debug;

use obra_domain::LedgerState;

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("snapshot `{0}` not found")]
    NotFound(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Filesystem-backed JSON persistence for ledger snapshots and their
/// backups.
#[derive(Clone)]
pub struct JsonSnapshotStorage {
    snapshots_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub ledger: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

impl JsonSnapshotStorage {
    pub fn new(snapshots_dir: PathBuf, backups_dir: PathBuf) -> StorageResult<Self> {
        Self::with_retention(snapshots_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        snapshots_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> StorageResult<Self> {
        fs::create_dir_all(&snapshots_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            snapshots_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    pub fn save(&self, name: &str, state: &LedgerState) -> StorageResult<()> {
        let path = self.snapshot_path(name);
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serde_json::to_string_pretty(state)?)?;
        fs::rename(&tmp, &path)?;
        debug!(ledger = %canonical_name(name), "snapshot saved");
        Ok(())
    }

    pub fn load(&self, name: &str) -> StorageResult<LedgerState> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Err(StorageError::NotFound(canonical_name(name)));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn list(&self) -> StorageResult<Vec<String>> {
        if !self.snapshots_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.snapshots_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.snapshot_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn list_backups(&self, name: &str) -> StorageResult<Vec<BackupInfo>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BackupInfo {
                    ledger: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by_key(|info| Reverse(info.created_at));
        Ok(entries)
    }

    pub fn restore_backup(&self, backup: &BackupInfo) -> StorageResult<LedgerState> {
        if !backup.path.exists() {
            return Err(StorageError::NotFound(backup.id.clone()));
        }
        let target = self.snapshot_path(&backup.ledger);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &target)?;
        self.load(&backup.ledger)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> StorageResult<()> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            SNAPSHOT_EXTENSION
        );
        fs::copy(path, dir.join(file_name))?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> StorageResult<()> {
        let entries = self.list_backups(name)?;
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", SNAPSHOT_EXTENSION))?;
    let mut segments = trimmed.split('_').collect::<Vec<_>>();
    if segments.len() < 2 {
        return None;
    }
    let time = segments.pop()?;
    let date = segments.pop()?;
    if !is_digits(date, 8) || !is_digits(time, 4) {
        return None;
    }
    let raw = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
