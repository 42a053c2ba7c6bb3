//! Termination Action
//!
//! Kills every process sharing the target's executable name, after refusing
//! a fixed deny-list of OS-critical names. Individual victims that vanish or
//! resist mid-kill are tolerated; only a fully failed group surfaces an
//! error.

use parking_lot::Mutex;
use serde::Serialize;
use std::process::Command;
use sysinfo::{Pid, System};

/// Process names that must never be terminated.
pub const PROTECTED_PROCESSES: &[&str] = &[
    "svchost.exe",
    "lsass.exe",
    "wininit.exe",
    "csrss.exe",
    "services.exe",
    "system",
    "system idle process",
];

/// Check a name against the deny-list, case-insensitively.
pub fn is_protected(name: &str) -> bool {
    PROTECTED_PROCESSES
        .iter()
        .any(|protected| name.eq_ignore_ascii_case(protected))
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub enum ActionError {
    /// Target pid no longer exists
    ProcessNotFound { pid: u32 },
    /// Target is on the deny-list
    ProtectedProcess { name: String },
    /// The OS refused every kill in the group
    AccessDenied { reason: String },
    /// The platform kill command could not run
    CommandFailed { command: String, stderr: String },
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::ProcessNotFound { pid } => write!(f, "Process {} not found", pid),
            ActionError::ProtectedProcess { name } => {
                write!(f, "Protected system process '{}'. Action blocked.", name)
            }
            ActionError::AccessDenied { reason } => write!(f, "Access denied: {}", reason),
            ActionError::CommandFailed { command, stderr } => {
                write!(f, "Command '{}' failed: {}", command, stderr)
            }
        }
    }
}

impl std::error::Error for ActionError {}

// ============================================================================
// TERMINATOR
// ============================================================================

/// Outcome of a group termination.
#[derive(Debug, Clone, Serialize)]
pub struct TerminationOutcome {
    pub name: String,
    pub terminated: u32,
}

pub struct ProcessTerminator {
    system: Mutex<System>,
}

impl ProcessTerminator {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    /// Terminate every process sharing the name of the process identified by
    /// `pid`.
    pub fn terminate_group(&self, pid: u32) -> Result<TerminationOutcome, ActionError> {
        let victims = {
            let mut sys = self.system.lock();
            sys.refresh_processes();

            let target = sys
                .process(Pid::from_u32(pid))
                .ok_or(ActionError::ProcessNotFound { pid })?;
            let name = target.name().to_string();

            if is_protected(&name) {
                return Err(ActionError::ProtectedProcess { name });
            }

            let pids: Vec<u32> = sys
                .processes()
                .iter()
                .filter(|(_, p)| p.name().eq_ignore_ascii_case(&name))
                .map(|(pid, _)| pid.as_u32())
                .collect();
            (name, pids)
        };

        let (name, pids) = victims;
        let mut terminated = 0u32;

        for victim in pids {
            match kill_pid(victim) {
                Ok(()) => terminated += 1,
                // Races and per-victim refusals are expected within a group
                Err(e) => log::debug!("could not terminate pid {}: {}", victim, e),
            }
        }

        if terminated == 0 {
            return Err(ActionError::AccessDenied {
                reason: format!("no process named '{}' could be terminated", name),
            });
        }

        log::warn!("terminated {} process(es) named '{}'", terminated, name);
        Ok(TerminationOutcome { name, terminated })
    }
}

impl Default for ProcessTerminator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
fn kill_pid(pid: u32) -> Result<(), ActionError> {
    let output = Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .output()
        .map_err(|e| ActionError::CommandFailed {
            command: "taskkill".to_string(),
            stderr: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ActionError::CommandFailed {
            command: "taskkill".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(not(windows))]
fn kill_pid(pid: u32) -> Result<(), ActionError> {
    let output = Command::new("kill")
        .args(["-9", &pid.to_string()])
        .output()
        .map_err(|e| ActionError::CommandFailed {
            command: "kill".to_string(),
            stderr: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ActionError::CommandFailed {
            command: "kill".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_names() {
        assert!(is_protected("lsass.exe"));
        assert!(is_protected("LSASS.EXE"));
        assert!(is_protected("System"));
        assert!(is_protected("System Idle Process"));
        assert!(!is_protected("notepad.exe"));
    }

    #[test]
    fn test_vanished_target_is_not_found() {
        let terminator = ProcessTerminator::new();
        // Pid 0 is never a killable user process under sysinfo's view,
        // and u32::MAX does not exist on any sane host
        let err = terminator.terminate_group(u32::MAX - 1).unwrap_err();
        assert!(matches!(err, ActionError::ProcessNotFound { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ActionError::ProtectedProcess {
            name: "lsass.exe".to_string(),
        };
        assert!(err.to_string().contains("lsass.exe"));
        assert!(err.to_string().contains("blocked"));

        let err = ActionError::ProcessNotFound { pid: 4242 };
        assert!(err.to_string().contains("4242"));
    }
}
