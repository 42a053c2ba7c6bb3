//! Result Persistence & Score History
//!
//! Each scan overwrites a single JSON document with the full sorted result
//! set; there is no append log or versioning. The score history is a small
//! in-memory ring of per-scan averages for the dashboard trend view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use crate::types::ProcessSnapshot;

const RESULTS_FILE_NAME: &str = "scan_results.json";

/// Scans of average-score history kept for the trend endpoint.
pub const MAX_SCORE_HISTORY: usize = 30;

// ============================================================================
// SNAPSHOT SINK
// ============================================================================

/// Destination for a finished scan's sorted snapshot sequence.
pub trait SnapshotSink: Send + Sync {
    fn persist(&self, snapshots: &[ProcessSnapshot]) -> Result<(), Box<dyn std::error::Error>>;
}

/// Overwrite-on-write JSON file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the platform data-local directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ProcWarden")
            .join(RESULTS_FILE_NAME)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the last persisted result set. A missing file is an empty set.
    pub fn load(&self) -> Result<Vec<ProcessSnapshot>, Box<dyn std::error::Error>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl SnapshotSink for JsonFileStore {
    fn persist(&self, snapshots: &[ProcessSnapshot]) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, snapshots)?;

        log::debug!(
            "persisted {} snapshots to {}",
            snapshots.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ============================================================================
// SCORE HISTORY
// ============================================================================

/// One scan's rounded average score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub avg_score: u8,
    pub recorded_at: DateTime<Utc>,
}

/// Rolling record of the last [`MAX_SCORE_HISTORY`] scan averages.
#[derive(Debug, Default)]
pub struct ScoreHistory {
    entries: VecDeque<ScoreEntry>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn record(&mut self, avg_score: u8) {
        self.entries.push_back(ScoreEntry {
            avg_score,
            recorded_at: Utc::now(),
        });
        while self.entries.len() > MAX_SCORE_HISTORY {
            self.entries.pop_front();
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, score: u8) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: 1,
            name: name.to_string(),
            publisher: "Unknown".to_string(),
            cpu_percent: 1.0,
            memory_mb: 10.0,
            connection_count: 0,
            anomaly: false,
            score,
            reason: "Unknown Publisher".to_string(),
        }
    }

    #[test]
    fn test_persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("results.json"));

        let snapshots = vec![snapshot("a.exe", 50), snapshot("b.exe", 95)];
        store.persist(&snapshots).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "a.exe");
        assert_eq!(loaded[1].score, 95);
    }

    #[test]
    fn test_persist_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("results.json"));

        store
            .persist(&[snapshot("a.exe", 50), snapshot("b.exe", 60)])
            .unwrap();
        store.persist(&[snapshot("c.exe", 20)]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "c.exe");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("never_written.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_score_history_caps_at_thirty() {
        let mut history = ScoreHistory::new();
        for i in 0..40u8 {
            history.record(i);
        }
        assert_eq!(history.len(), MAX_SCORE_HISTORY);

        let entries = history.entries();
        // Oldest entries were evicted first
        assert_eq!(entries.first().unwrap().avg_score, 10);
        assert_eq!(entries.last().unwrap().avg_score, 39);
    }
}
