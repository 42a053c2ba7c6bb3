//! Configuration module

use std::env;
use std::path::PathBuf;

use procwarden_engine::store::JsonFileStore;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Where scan results are persisted
    pub results_path: PathBuf,

    /// CPU sampling window in milliseconds
    pub cpu_sample_ms: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            results_path: env::var("PROCWARDEN_RESULTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| JsonFileStore::default_path()),

            cpu_sample_ms: env::var("PROCWARDEN_CPU_SAMPLE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cpu_sample_ms, 200);
        assert!(!config.environment.is_empty());
    }
}
