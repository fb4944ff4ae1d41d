//! Backup management for stored data that could not be loaded.
//!
//! When a stored blob cannot be parsed, the program starts over from empty data and the next save
//! replaces the blob. A copy is written here first so that nothing is lost for good.

use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self::with_dir(config.backups(), config.backup_copies())
    }

    /// Creates a new `Backup` instance that writes into `backups_dir`.
    pub fn with_dir(backups_dir: impl AsRef<Path>, backup_copies: u32) -> Self {
        Self {
            backups_dir: backups_dir.as_ref().to_path_buf(),
            backup_copies,
        }
    }

    /// Saves `content` as a backup of the blob stored under `key`.
    ///
    /// The filename format is `{key}.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files.
    ///
    /// Returns the path to the created backup file.
    pub async fn save_blob(&self, key: &str, content: &str) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(key, &date).await?;
        let filename = format!("{key}.{date}-{seq:03}.json");
        let path = self.backups_dir.join(&filename);

        utils::write(&path, content).await?;

        self.rotate(key).await?;

        Ok(path)
    }

    /// Scans the backups directory for existing files with the given key and date,
    /// and returns the next sequence number.
    async fn next_sequence_number(&self, key: &str, date: &str) -> Result<u32> {
        let pattern_start = format!("{key}.{date}-");
        let mut max_seq: u32 = 0;

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            if name.starts_with(&pattern_start) {
                if let Some(seq) = parse_sequence_number(&name, key, date) {
                    max_seq = max_seq.max(seq);
                }
            }
        }

        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files for the given key.
    async fn rotate(&self, key: &str) -> Result<()> {
        let mut files: Vec<(PathBuf, String)> = Vec::new();

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy().to_string();

            if is_backup_file(&name, key) {
                files.push((entry.path(), name));
            }
        }

        // Sort by filename (which sorts by date and sequence number due to format)
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (path, _) in files.into_iter().take(to_delete) {
            utils::remove(&path).await?;
        }

        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_sequence_number(filename: &str, key: &str, date: &str) -> Option<u32> {
    // Pattern: {key}.{date}-{NNN}.json
    let remainder = filename.strip_prefix(&format!("{key}.{date}-"))?;
    remainder.strip_suffix(".json")?.parse().ok()
}

/// Checks if a filename is a backup file for the given key.
fn is_backup_file(filename: &str, key: &str) -> bool {
    filename.starts_with(&format!("{key}.")) && filename.ends_with(".json")
}
