//! Telemetry Collector
//!
//! Samples per-process CPU, memory and connection counts via the sysinfo
//! crate. CPU usage needs two refreshes separated by a short interval, so a
//! sample blocks for the sampling window. Processes that exit between the
//! refreshes simply drop out of the result.

use parking_lot::Mutex;
use std::time::Duration;
use sysinfo::System;

use crate::connections;
use crate::types::RawProcessSample;

/// Default CPU sampling window.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Pseudo-processes that only account for idle time.
const IDLE_PROCESS_NAMES: &[&str] = &["system idle process", "idle"];

/// Source of raw per-process observations.
pub trait ProcessCollector: Send + Sync {
    fn sample(&self) -> Vec<RawProcessSample>;
}

/// Live-system collector.
pub struct SystemCollector {
    system: Mutex<System>,
    sample_interval: Duration,
}

impl SystemCollector {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_SAMPLE_INTERVAL)
    }

    pub fn with_interval(sample_interval: Duration) -> Self {
        Self {
            system: Mutex::new(System::new()),
            // sysinfo returns garbage CPU deltas below its minimum interval
            sample_interval: sample_interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCollector for SystemCollector {
    fn sample(&self) -> Vec<RawProcessSample> {
        let counts = connections::connection_counts();

        let mut sys = self.system.lock();
        sys.refresh_processes();
        std::thread::sleep(self.sample_interval);
        sys.refresh_processes();

        let mut samples = Vec::with_capacity(sys.processes().len());
        for (pid, process) in sys.processes() {
            let name = process.name().to_string();
            if name.is_empty() || is_idle_process(&name) {
                continue;
            }

            let pid_u32 = pid.as_u32();
            samples.push(RawProcessSample {
                pid: pid_u32,
                exe_path: process.exe().map(|p| p.to_path_buf()),
                cpu_percent: clamp_cpu(process.cpu_usage()),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
                connection_count: counts.get(&pid_u32).copied().unwrap_or(0),
                name,
            });
        }

        log::debug!("collected {} process samples", samples.len());
        samples
    }
}

/// Clamp a CPU reading into [0, 100]; non-finite readings collapse to 0.
pub(crate) fn clamp_cpu(cpu: f32) -> f32 {
    if !cpu.is_finite() {
        return 0.0;
    }
    cpu.clamp(0.0, 100.0)
}

pub(crate) fn is_idle_process(name: &str) -> bool {
    IDLE_PROCESS_NAMES
        .iter()
        .any(|idle| name.eq_ignore_ascii_case(idle))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_cpu() {
        assert_eq!(clamp_cpu(42.5), 42.5);
        assert_eq!(clamp_cpu(350.0), 100.0);
        assert_eq!(clamp_cpu(-1.0), 0.0);
        assert_eq!(clamp_cpu(f32::NAN), 0.0);
    }

    #[test]
    fn test_idle_process_filter() {
        assert!(is_idle_process("System Idle Process"));
        assert!(is_idle_process("Idle"));
        assert!(!is_idle_process("systemd"));
    }

    #[test]
    fn test_live_samples_respect_invariants() {
        let collector = SystemCollector::new();
        for sample in collector.sample() {
            assert!(!sample.name.is_empty());
            assert!(!is_idle_process(&sample.name));
            assert!(sample.cpu_percent >= 0.0 && sample.cpu_percent <= 100.0);
            assert!(sample.memory_mb >= 0.0);
        }
    }
}
