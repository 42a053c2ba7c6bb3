//! Anomaly Detector
//!
//! Keeps a bounded window of recent CPU readings per process name and flags
//! readings that spike well above the process's own rolling baseline. The
//! absolute floor keeps low-usage noise from tripping the relative check.

use std::collections::{HashMap, VecDeque};

/// Readings kept per process name, oldest evicted first.
pub const HISTORY_WINDOW: usize = 10;

/// Relative spike factor: a reading must exceed this multiple of the
/// window mean.
const SPIKE_FACTOR: f32 = 2.0;

/// Absolute floor below which a reading is never anomalous.
const SPIKE_FLOOR: f32 = 30.0;

/// Verdict for a single observation.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyVerdict {
    pub anomaly: bool,
    /// Mean of the window including the observation itself.
    pub window_mean: f32,
}

/// Per-name rolling CPU history. Owned by the scan engine; keyed by process
/// name, so a relaunched process inherits its predecessor's baseline.
#[derive(Debug, Default)]
pub struct CpuHistoryStore {
    windows: HashMap<String, VecDeque<f32>>,
}

impl CpuHistoryStore {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }

    /// Record a CPU reading and judge it against the window it just joined.
    ///
    /// The first-ever reading for a name can never be flagged: the mean
    /// equals the reading, so the relative condition fails.
    pub fn observe(&mut self, name: &str, cpu: f32) -> AnomalyVerdict {
        let window = self
            .windows
            .entry(name.to_string())
            .or_insert_with(VecDeque::new);

        window.push_back(cpu);
        if window.len() > HISTORY_WINDOW {
            window.pop_front();
        }

        let window_mean = window.iter().sum::<f32>() / window.len() as f32;
        let anomaly = cpu > window_mean * SPIKE_FACTOR && cpu > SPIKE_FLOOR;

        AnomalyVerdict {
            anomaly,
            window_mean,
        }
    }

    /// Current window for a name, oldest first.
    pub fn window(&self, name: &str) -> Option<&VecDeque<f32>> {
        self.windows.get(name)
    }

    /// Number of process names with recorded history.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
