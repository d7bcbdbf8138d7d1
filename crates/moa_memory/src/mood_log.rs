//! Mood journal — timestamped record of classified moods.
//!
//! Stored as a single JSON array, appended on each entry. Logging failures
//! are reported as `false` and logged; the journal must never take the
//! conversation down with it.

use chrono::{DateTime, Utc};
use moa_core::MoodLabel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub timestamp: DateTime<Utc>,
    pub mood: MoodLabel,
    pub message: String,
}

pub struct MoodLog {
    path: PathBuf,
}

impl MoodLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append a mood entry. Returns whether the entry was written.
    pub async fn record(&self, mood: MoodLabel, message: &str) -> bool {
        let entry = MoodEntry {
            timestamp: Utc::now(),
            mood,
            message: message.to_string(),
        };
        let mut entries = self.read_entries().await;
        entries.push(entry);
        match self.write_entries(&entries).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to write mood log");
                false
            }
        }
    }

    /// The most recent `n` entries, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<MoodEntry> {
        let entries = self.read_entries().await;
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    /// Entries recorded on a specific date (`YYYY-MM-DD`).
    pub async fn by_date(&self, date: &str) -> Vec<MoodEntry> {
        self.read_entries()
            .await
            .into_iter()
            .filter(|entry| entry.timestamp.date_naive().to_string() == date)
            .collect()
    }

    async fn read_entries(&self) -> Vec<MoodEntry> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "mood log failed to parse, starting over"
                );
                Vec::new()
            }
        }
    }

    async fn write_entries(&self, entries: &[MoodEntry]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}
