//! Assessment Report
//!
//! Rolls one scan's snapshots up into an overall trust summary. The server
//! serializes the structure as-is; presentation is the consumer's problem.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::ProcessSnapshot;

/// Overall posture derived from the average trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    High,
    Medium,
    Safe,
}

impl ThreatLevel {
    pub fn from_average(avg_score: u8) -> Self {
        if avg_score < 50 {
            ThreatLevel::High
        } else if avg_score < 80 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::High => "HIGH",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::Safe => "SAFE",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub cpu_percent: f32,
    pub score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub hostname: Option<String>,
    pub overall_score: u8,
    pub threat_level: ThreatLevel,
    pub process_count: usize,
    pub anomaly_count: usize,
    pub rows: Vec<ReportRow>,
}

impl AssessmentReport {
    pub fn build(snapshots: &[ProcessSnapshot]) -> Self {
        // An empty host view has nothing to distrust
        let overall_score = average_score(snapshots).unwrap_or(100);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            hostname: hostname::get()
                .ok()
                .map(|h| h.to_string_lossy().to_string()),
            overall_score,
            threat_level: ThreatLevel::from_average(overall_score),
            process_count: snapshots.len(),
            anomaly_count: snapshots.iter().filter(|s| s.anomaly).count(),
            rows: snapshots
                .iter()
                .map(|s| ReportRow {
                    name: s.name.clone(),
                    cpu_percent: s.cpu_percent,
                    score: s.score,
                    reason: s.reason.clone(),
                })
                .collect(),
        }
    }
}

/// Rounded mean score across a result set; None when empty.
pub fn average_score(snapshots: &[ProcessSnapshot]) -> Option<u8> {
    if snapshots.is_empty() {
        return None;
    }
    let sum: u32 = snapshots.iter().map(|s| s.score as u32).sum();
    Some((sum as f64 / snapshots.len() as f64).round() as u8)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, score: u8, anomaly: bool) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: 1,
            name: name.to_string(),
            publisher: "Unknown".to_string(),
            cpu_percent: 5.0,
            memory_mb: 32.0,
            connection_count: 0,
            anomaly,
            score,
            reason: "Unknown Publisher".to_string(),
        }
    }

    #[test]
    fn test_threat_level_boundaries() {
        assert_eq!(ThreatLevel::from_average(49), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_average(50), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_average(79), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_average(80), ThreatLevel::Safe);
        assert_eq!(ThreatLevel::from_average(100), ThreatLevel::Safe);
    }

    #[test]
    fn test_average_score_rounds() {
        let snapshots = vec![snapshot("a", 50, false), snapshot("b", 95, false)];
        // 72.5 rounds to 73
        assert_eq!(average_score(&snapshots), Some(73));
        assert_eq!(average_score(&[]), None);
    }

    #[test]
    fn test_build_report() {
        let snapshots = vec![
            snapshot("anydesk.exe", 5, true),
            snapshot("mystery.exe", 50, false),
            snapshot("svchost.exe", 95, false),
        ];

        let report = AssessmentReport::build(&snapshots);
        assert_eq!(report.process_count, 3);
        assert_eq!(report.anomaly_count, 1);
        assert_eq!(report.overall_score, 50);
        assert_eq!(report.threat_level, ThreatLevel::Medium);
        assert_eq!(report.threat_level.as_str(), "MEDIUM");
        assert_eq!(report.rows.len(), 3);
        assert!(!report.id.is_empty());
    }

    #[test]
    fn test_empty_scan_reports_safe() {
        let report = AssessmentReport::build(&[]);
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.threat_level, ThreatLevel::Safe);
        assert_eq!(report.process_count, 0);
        assert!(report.rows.is_empty());
    }
}
