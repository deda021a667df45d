//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the citation network engine,
//! supporting TOML files and environment variable overrides with validation
//! and type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use citation_network::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{CitationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Citation extraction settings
    pub extraction: ExtractionConfig,
    /// Network building behavior
    pub network: NetworkConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
    /// Performance tuning
    pub performance: PerformanceConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request payload size in MB
    pub max_payload_size_mb: u32,
    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Enable CORS
    pub enable_cors: bool,
}

/// Citation extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Characters of surrounding text captured on each side of a match
    pub context_window_chars: usize,
    /// Snippets shorter than this are penalized in confidence scoring
    pub short_snippet_threshold: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_window_chars: 100,
            short_snippet_threshold: 50,
        }
    }
}

/// Network building configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Extract documents in parallel during the map phase
    pub parallel_extraction: bool,
    /// Warn when a corpus exceeds this size (edge resolution is O(N²))
    pub large_corpus_warning_threshold: usize,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

/// Performance tuning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Number of worker threads for parallel extraction
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| CitationError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| CitationError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        // Apply environment variable overrides
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("CITATION_NET_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CITATION_NET_PORT") {
            self.server.port = port.parse().map_err(|_| CitationError::Config {
                message: "Invalid port number in CITATION_NET_PORT".to_string(),
            })?;
        }
        if let Ok(level) = std::env::var("CITATION_NET_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(threads) = std::env::var("CITATION_NET_WORKER_THREADS") {
            self.performance.worker_threads =
                threads.parse().map_err(|_| CitationError::Config {
                    message: "Invalid thread count in CITATION_NET_WORKER_THREADS".to_string(),
                })?;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(CitationError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.extraction.context_window_chars == 0 {
            return Err(CitationError::ValidationFailed {
                field: "extraction.context_window_chars".to_string(),
                reason: "Context window must be greater than zero".to_string(),
            });
        }

        if self.performance.worker_threads == 0 {
            return Err(CitationError::ValidationFailed {
                field: "performance.worker_threads".to_string(),
                reason: "Worker thread count must be greater than zero".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(CitationError::ValidationFailed {
                field: "logging.level".to_string(),
                reason: format!("Unknown log level: {}", self.logging.level),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CitationError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_payload_size_mb: 10,
                request_timeout_seconds: 30,
                enable_cors: true,
            },
            extraction: ExtractionConfig::default(),
            network: NetworkConfig {
                parallel_extraction: true,
                large_corpus_warning_threshold: 10_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
            performance: PerformanceConfig {
                worker_threads: num_cpus::get(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.toml");

        let config = Config::default();
        config.save_to_file(&path).expect("save config");

        let loaded = Config::from_file(&path).expect("load config");
        assert_eq!(loaded.server.port, config.server.port);
        assert_eq!(
            loaded.extraction.context_window_chars,
            config.extraction.context_window_chars
        );
    }
}
