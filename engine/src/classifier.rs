//! Heuristic Classifier
//!
//! Maps (process name, publisher) to a base trust score by walking an
//! ordered rule table, first match wins. Rule order matters: a known
//! remote-access executable stays low-trust even when its binary carries a
//! trusted signature.

use crate::types::UNKNOWN_PUBLISHER;

// ============================================================================
// RULE TABLES
// ============================================================================

/// Executable names that enable remote control of the host.
pub const REMOTE_ACCESS_TOOLS: &[&str] = &[
    "anydesk.exe",
    "teamviewer.exe",
    "rustdesk.exe",
    "mstsc.exe",
];

/// Core OS processes expected on every healthy host.
pub const TRUSTED_SYSTEM_PROCESSES: &[&str] = &[
    "explorer.exe",
    "svchost.exe",
    "services.exe",
    "lsass.exe",
    "wininit.exe",
    "csrss.exe",
    "cmd.exe",
];

/// Publisher substrings treated as trustworthy vendors.
pub const TRUSTED_PUBLISHERS: &[&str] = &[
    "microsoft",
    "google",
    "adobe",
    "intel",
    "nvidia",
    "mozilla",
    "oracle",
    "vmware",
];

// ============================================================================
// RULES
// ============================================================================

/// Which rule of the table matched, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TrustRule {
    RemoteAccessTool,
    TrustedSystem,
    TrustedPublisher,
    UnknownPublisher,
    ThirdParty,
}

impl TrustRule {
    pub fn base_score(&self) -> u8 {
        match self {
            TrustRule::RemoteAccessTool => 20,
            TrustRule::TrustedSystem => 95,
            TrustRule::TrustedPublisher => 90,
            TrustRule::UnknownPublisher => 50,
            TrustRule::ThirdParty => 60,
        }
    }
}

/// Outcome of classifying one process.
#[derive(Debug, Clone)]
pub struct Classification {
    pub rule: TrustRule,
    pub base_score: u8,
    pub reason: String,
}

/// Check a publisher string against the trusted-vendor substrings.
pub fn is_publisher_trusted(publisher: &str) -> bool {
    let publisher_lower = publisher.to_lowercase();
    TRUSTED_PUBLISHERS
        .iter()
        .any(|trusted| publisher_lower.contains(trusted))
}

/// Evaluate the rule table for one process. Name comparison is
/// case-insensitive; publisher matching is case-insensitive substring,
/// except the Unknown sentinel which is compared exactly.
pub fn classify(name: &str, publisher: &str) -> Classification {
    let name_lower = name.to_lowercase();

    let (rule, reason) = if REMOTE_ACCESS_TOOLS.contains(&name_lower.as_str()) {
        (TrustRule::RemoteAccessTool, "Remote Access Tool".to_string())
    } else if TRUSTED_SYSTEM_PROCESSES.contains(&name_lower.as_str()) {
        (TrustRule::TrustedSystem, "Windows System Process".to_string())
    } else if is_publisher_trusted(publisher) {
        (
            TrustRule::TrustedPublisher,
            format!("Trusted Publisher ({})", publisher),
        )
    } else if publisher == UNKNOWN_PUBLISHER {
        (TrustRule::UnknownPublisher, "Unknown Publisher".to_string())
    } else {
        (TrustRule::ThirdParty, format!("Third Party ({})", publisher))
    };

    Classification {
        rule,
        base_score: rule.base_score(),
        reason,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MAX_SCORE, MIN_SCORE};

    #[test]
    fn test_remote_access_tool() {
        let c = classify("anydesk.exe", UNKNOWN_PUBLISHER);
        assert_eq!(c.rule, TrustRule::RemoteAccessTool);
        assert_eq!(c.base_score, 20);
        assert_eq!(c.reason, "Remote Access Tool");
    }

    #[test]
    fn test_remote_access_wins_over_trusted_publisher() {
        // A signed remote-control binary must still classify as a remote tool
        let c = classify("TeamViewer.exe", "TeamViewer Germany GmbH");
        assert_eq!(c.rule, TrustRule::RemoteAccessTool);

        let c = classify("mstsc.exe", "Microsoft Corporation");
        assert_eq!(c.rule, TrustRule::RemoteAccessTool);
        assert_eq!(c.base_score, 20);
    }

    #[test]
    fn test_system_process_regardless_of_publisher() {
        let c = classify("svchost.exe", UNKNOWN_PUBLISHER);
        assert_eq!(c.rule, TrustRule::TrustedSystem);
        assert_eq!(c.base_score, 95);
        assert_eq!(c.reason, "Windows System Process");
    }

    #[test]
    fn test_trusted_publisher_substring() {
        let c = classify("chrome.exe", "Google Inc.");
        assert_eq!(c.rule, TrustRule::TrustedPublisher);
        assert_eq!(c.base_score, 90);
        assert_eq!(c.reason, "Trusted Publisher (Google Inc.)");
    }

    #[test]
    fn test_unknown_publisher() {
        let c = classify("mystery.exe", UNKNOWN_PUBLISHER);
        assert_eq!(c.rule, TrustRule::UnknownPublisher);
        assert_eq!(c.base_score, 50);
        assert_eq!(c.reason, "Unknown Publisher");
    }

    #[test]
    fn test_third_party() {
        let c = classify("slack.exe", "Slack Technologies");
        assert_eq!(c.rule, TrustRule::ThirdParty);
        assert_eq!(c.base_score, 60);
        assert_eq!(c.reason, "Third Party (Slack Technologies)");
    }

    #[test]
    fn test_name_matching_is_case_insensitive() {
        let c = classify("SVCHOST.EXE", UNKNOWN_PUBLISHER);
        assert_eq!(c.rule, TrustRule::TrustedSystem);
    }

    #[test]
    fn test_publisher_matching_is_case_insensitive() {
        assert!(is_publisher_trusted("MICROSOFT CORPORATION"));
        assert!(is_publisher_trusted("Mozilla Corporation"));
        assert!(!is_publisher_trusted("Random Malware Inc"));
    }

    #[test]
    fn test_base_scores_within_bounds() {
        for rule in [
            TrustRule::RemoteAccessTool,
            TrustRule::TrustedSystem,
            TrustRule::TrustedPublisher,
            TrustRule::UnknownPublisher,
            TrustRule::ThirdParty,
        ] {
            let score = rule.base_score();
            assert!(score >= MIN_SCORE && score <= MAX_SCORE);
        }
    }
}
