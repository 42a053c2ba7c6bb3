//! Publisher Resolver
//!
//! Resolves an executable path to its vendor identity string. Lookups go
//! through the OS (version resources on Windows); every failure mode
//! collapses to the "Unknown" sentinel so the scan never stalls on metadata.
//! Results are cached per path because the lookup is expensive relative to
//! the rest of the pipeline.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;

use crate::types::UNKNOWN_PUBLISHER;

const CACHE_MAX_SIZE: usize = 1000;

/// Identity lookup for an executable. Must never fail: unresolvable input
/// yields the Unknown sentinel.
pub trait PublisherResolver: Send + Sync {
    fn resolve(&self, exe_path: Option<&Path>) -> String;
}

/// OS-backed resolver with a bounded per-path cache.
pub struct SystemPublisherResolver {
    cache: RwLock<HashMap<String, String>>,
}

impl SystemPublisherResolver {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.read().len()
    }
}

impl Default for SystemPublisherResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PublisherResolver for SystemPublisherResolver {
    fn resolve(&self, exe_path: Option<&Path>) -> String {
        let Some(path) = exe_path else {
            return UNKNOWN_PUBLISHER.to_string();
        };

        let key = path.to_string_lossy().to_lowercase();
        if let Some(hit) = self.cache.read().get(&key) {
            return hit.clone();
        }

        let publisher = lookup_publisher(path);

        {
            let mut cache = self.cache.write();
            // Evict half the cache when full
            if cache.len() >= CACHE_MAX_SIZE {
                let keys: Vec<_> = cache.keys().take(CACHE_MAX_SIZE / 2).cloned().collect();
                for key in keys {
                    cache.remove(&key);
                }
            }
            cache.insert(key, publisher.clone());
        }

        publisher
    }
}

// ============================================================================
// OS LOOKUP
// ============================================================================

/// Read the CompanyName version resource via PowerShell.
#[cfg(windows)]
fn lookup_publisher(path: &Path) -> String {
    use std::process::Command;

    if !path.exists() {
        return UNKNOWN_PUBLISHER.to_string();
    }

    let ps_script = format!(
        "(Get-Item -LiteralPath '{}').VersionInfo.CompanyName",
        path.display()
    );

    let output = match Command::new("powershell")
        .args(["-NoProfile", "-Command", &ps_script])
        .output()
    {
        Ok(out) => out,
        Err(e) => {
            log::debug!("publisher lookup failed for {}: {}", path.display(), e);
            return UNKNOWN_PUBLISHER.to_string();
        }
    };

    if !output.status.success() {
        return UNKNOWN_PUBLISHER.to_string();
    }

    normalize_publisher(&String::from_utf8_lossy(&output.stdout))
}

/// Executables carry no vendor metadata the OS can report here.
#[cfg(not(windows))]
fn lookup_publisher(_path: &Path) -> String {
    UNKNOWN_PUBLISHER.to_string()
}

/// Trim a raw lookup result; blank output means the resource was absent.
pub(crate) fn normalize_publisher(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNKNOWN_PUBLISHER.to_string()
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
