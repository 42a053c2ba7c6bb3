//! Shared engine types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sentinel returned whenever an executable's publisher cannot be resolved.
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Lowest trust score a process can be assigned.
pub const MIN_SCORE: u8 = 5;

/// Highest trust score a process can be assigned.
pub const MAX_SCORE: u8 = 100;

// ============================================================================
// RAW TELEMETRY
// ============================================================================

/// One per-process observation as produced by the collector, before any
/// classification or scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProcessSample {
    pub pid: u32,
    pub name: String,
    pub exe_path: Option<PathBuf>,
    /// CPU usage over the sampling interval, clamped to [0, 100].
    pub cpu_percent: f32,
    /// Resident memory in megabytes.
    pub memory_mb: f64,
    /// Established inet endpoints owned by this process.
    pub connection_count: usize,
}

// ============================================================================
// SCORED RESULT
// ============================================================================

/// Final per-process triage verdict for one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    /// Resolved publisher identity, or [`UNKNOWN_PUBLISHER`].
    pub publisher: String,
    pub cpu_percent: f32,
    pub memory_mb: f64,
    pub connection_count: usize,
    pub anomaly: bool,
    /// Trust score in [5, 100]. Lower is more suspicious.
    pub score: u8,
    /// Classification justification, suffixed with " | Anomaly" when flagged.
    pub reason: String,
}
