//! Command history stores injected into the interpreter.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries kept by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere to remember submitted commands.
pub trait CommandHistoryStore {
    fn append(&mut self, command: &str);

    /// Up to `n` commands, newest first.
    fn recent(&self, n: usize) -> Vec<String>;
}

impl<T: CommandHistoryStore + ?Sized> CommandHistoryStore for Box<T> {
    fn append(&mut self, command: &str) {
        (**self).append(command)
    }

    fn recent(&self, n: usize) -> Vec<String> {
        (**self).recent(n)
    }
}

/// Bounded in-memory history.
#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    entries: VecDeque<String>,
    limit: usize,
}

impl InMemoryHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistoryStore for InMemoryHistory {
    fn append(&mut self, command: &str) {
        self.entries.push_back(command.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    fn recent(&self, n: usize) -> Vec<String> {
        self.entries.iter().rev().take(n).cloned().collect()
    }
}

/// One persisted history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded history persisted as a JSON array of [`HistoryEntry`].
#[derive(Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl JsonFileHistory {
    /// Open `path`, starting empty if it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with_limit(path, DEFAULT_HISTORY_LIMIT)
    }

    pub fn open_with_limit(path: impl Into<PathBuf>, limit: usize) -> Self {
        let path = path.into();
        let limit = limit.max(1);
        let mut entries: VecDeque<HistoryEntry> = match Self::load(&path) {
            Ok(entries) => entries.into(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring unreadable command history: {}", e);
                VecDeque::new()
            }
        };
        while entries.len() > limit {
            entries.pop_front();
        }
        Self {
            path,
            entries,
            limit,
        }
    }

    /// Default location in the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "doodle", "doodle")
            .map(|dirs| dirs.data_dir().join("command_history.json"))
    }

    fn load(path: &Path) -> Result<Vec<HistoryEntry>, HistoryError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandHistoryStore for JsonFileHistory {
    fn append(&mut self, command: &str) {
        self.entries.push_back(HistoryEntry {
            text: command.to_string(),
            timestamp: Utc::now(),
        });
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        if let Err(e) = self.save() {
            tracing::warn!(path = %self.path.display(), "Failed to save command history: {}", e);
        }
    }

    fn recent(&self, n: usize) -> Vec<String> {
        self.entries
            .iter()
            .rev()
            .take(n)
            .map(|e| e.text.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_bounded_newest_first() {
        let mut history = InMemoryHistory::with_limit(3);
        for cmd in ["a", "b", "c", "d"] {
            history.append(cmd);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.recent(10), ["d", "c", "b"]);
        assert_eq!(history.recent(1), ["d"]);
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn test_default_limit() {
        let mut history = InMemoryHistory::default();
        for i in 0..60 {
            history.append(&format!("cmd {i}"));
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.recent(1), ["cmd 59"]);
    }

    #[test]
    fn test_json_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut history = JsonFileHistory::open(&path);
        history.append("create a cube");
        history.append("clear");
        assert!(path.exists());

        let reopened = JsonFileHistory::open(&path);
        assert_eq!(reopened.recent(5), ["clear", "create a cube"]);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["text"], "create a cube");
        assert!(raw[0]["timestamp"].is_string());
    }

    #[test]
    fn test_json_file_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = JsonFileHistory::open_with_limit(&path, 2);
        for cmd in ["one", "two", "three"] {
            history.append(cmd);
        }
        assert_eq!(JsonFileHistory::open(&path).recent(10), ["three", "two"]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();
        let history = JsonFileHistory::open(&path);
        assert!(history.recent(10).is_empty());
    }
}
