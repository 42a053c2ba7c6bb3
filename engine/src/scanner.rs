//! Scan Engine
//!
//! Composes collector, publisher resolver, classifier and anomaly detector
//! into one synchronous scan pass. Scans serialize through the history lock:
//! the rolling CPU windows are shared mutable state, so at most one scan may
//! run at a time.

use parking_lot::Mutex;

use crate::anomaly::CpuHistoryStore;
use crate::classifier;
use crate::collector::ProcessCollector;
use crate::publisher::PublisherResolver;
use crate::store::SnapshotSink;
use crate::types::{ProcessSnapshot, MIN_SCORE};

/// Score penalty applied to anomalous processes.
const ANOMALY_PENALTY: u8 = 20;

const ANOMALY_SUFFIX: &str = " | Anomaly";

pub struct ScanEngine {
    collector: Box<dyn ProcessCollector>,
    resolver: Box<dyn PublisherResolver>,
    sink: Option<Box<dyn SnapshotSink>>,
    history: Mutex<CpuHistoryStore>,
}

impl ScanEngine {
    pub fn new(
        collector: Box<dyn ProcessCollector>,
        resolver: Box<dyn PublisherResolver>,
        sink: Option<Box<dyn SnapshotSink>>,
    ) -> Self {
        Self {
            collector,
            resolver,
            sink,
            history: Mutex::new(CpuHistoryStore::new()),
        }
    }

    /// Run one scan pass and return the snapshots sorted ascending by score,
    /// most suspicious first.
    ///
    /// The history lock is held for the entire pass, so concurrent callers
    /// queue up rather than interleave window updates.
    pub fn run_scan(&self) -> Vec<ProcessSnapshot> {
        let mut history = self.history.lock();

        let samples = self.collector.sample();
        let mut snapshots = Vec::with_capacity(samples.len());

        for sample in samples {
            let publisher = self.resolver.resolve(sample.exe_path.as_deref());
            let classification = classifier::classify(&sample.name, &publisher);
            let verdict = history.observe(&sample.name, sample.cpu_percent);

            let (score, reason) = if verdict.anomaly {
                (
                    classification
                        .base_score
                        .saturating_sub(ANOMALY_PENALTY)
                        .max(MIN_SCORE),
                    format!("{}{}", classification.reason, ANOMALY_SUFFIX),
                )
            } else {
                (classification.base_score, classification.reason)
            };

            snapshots.push(ProcessSnapshot {
                pid: sample.pid,
                name: sample.name,
                publisher,
                cpu_percent: round_tenth(sample.cpu_percent),
                memory_mb: round_tenth_f64(sample.memory_mb),
                connection_count: sample.connection_count,
                anomaly: verdict.anomaly,
                score,
                reason,
            });
        }

        snapshots.sort_by_key(|s| s.score);

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.persist(&snapshots) {
                log::warn!("failed to persist scan results: {}", e);
            }
        }

        log::info!(
            "scan complete: {} processes, {} anomalous",
            snapshots.len(),
            snapshots.iter().filter(|s| s.anomaly).count()
        );

        snapshots
    }

    /// Number of process names with recorded CPU history.
    pub fn tracked_names(&self) -> usize {
        self.history.lock().len()
    }
}

fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

fn round_tenth_f64(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ============================================================================
// TESTS
// ============================================================================
