use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Probe target and cadence
    pub probe: ProbeConfig,

    /// Durable average record
    pub persistence: PersistenceConfig,

    /// Optional status report endpoint
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            persistence: PersistenceConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Target URL to probe
    pub target_url: String,

    /// Seconds between latency checks
    pub interval_secs: u64,

    /// Per-probe timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target_url: String::new(),
            interval_secs: 10,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Path of the single-slot average record
    pub record_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            record_path: PathBuf::from("latency.log"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Whether the status endpoint listens at all
    pub enabled: bool,

    /// Port for the status endpoint
    pub port: u16,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.probe.interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.target_url.is_empty() {
            return Err(ConfigError::EmptyTargetUrl);
        }
        if self.probe.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::InvalidProbeTimeout);
        }
        if self.report.port == 0 {
            return Err(ConfigError::InvalidReportPort);
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file.
pub struct ConfigManager {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            config: AppConfig::default(),
        }
    }

    /// Load configuration from file. A missing file leaves the defaults in
    /// place so CLI flags can fill in the rest.
    pub async fn load(&mut self) -> Result<(), ConfigError> {
        if !self.config_path.exists() {
            return Ok(());
        }

        let content = tokio::fs::read_to_string(&self.config_path).await?;
        self.config = toml::from_str(&content)?;
        Ok(())
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }
}
