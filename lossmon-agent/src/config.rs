//! Configuration management for the monitor
//!
//! Handles:
//! - Host registry (defaults to public resolvers + local router)
//! - Probe program, count flag and optional timeout
//! - Log file path and loss indicator set
//! - Cross-platform storage (`$LOSSMON_CONFIG` or the OS config dir)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::detection::{IndicatorSet, DEFAULT_INDICATOR_SET};
use crate::error::ConfigError;
use crate::execution::{default_count_flag, PingProber};
use crate::registry::{HostRegistry, DEFAULT_HOSTS};

pub const CONFIG_ENV_VAR: &str = "LOSSMON_CONFIG";
pub const DEFAULT_LOG_PATH: &str = "log_alertas.txt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub monitor: LoopConfig,
    pub probe: ProbeConfig,
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub hosts: Vec<String>,
    pub probe_interval_ms: u64,
    pub cycle_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub program: String,
    pub count_flag: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub log_path: PathBuf,
    pub indicator_set: String,
    pub extra_indicators: Vec<String>,
    pub console: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_HOSTS.iter().map(|h| h.to_string()).collect(),
            probe_interval_ms: 0,
            cycle_interval_ms: 0,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: "ping".to_string(),
            count_flag: default_count_flag().to_string(),
            timeout_secs: 0,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            indicator_set: DEFAULT_INDICATOR_SET.to_string(),
            extra_indicators: Vec::new(),
            console: true,
        }
    }
}

impl LoopConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }
}

impl MonitorConfig {
    /// Missing file means defaults; a malformed one is an error
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MonitorConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Save config to the given location, creating parent directories
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Get config file path (env override first)
    pub fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;

        path.push("lossmon");
        path.push("config.toml");
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.host_registry()?;
        self.indicator_set()?;

        if self.probe.program.trim().is_empty() {
            return Err(ConfigError::EmptyProgram);
        }
        if self.probe.count_flag.trim().is_empty() {
            return Err(ConfigError::EmptyCountFlag);
        }
        Ok(())
    }

    pub fn host_registry(&self) -> Result<HostRegistry, ConfigError> {
        HostRegistry::from_addresses(&self.monitor.hosts)
    }

    pub fn indicator_set(&self) -> Result<IndicatorSet, ConfigError> {
        Ok(IndicatorSet::builtin(&self.alerts.indicator_set)?
            .with_extra(self.alerts.extra_indicators.iter().cloned()))
    }

    pub fn prober(&self) -> PingProber {
        PingProber::new(self.probe.program.trim(), self.probe.count_flag.trim())
            .with_timeout_secs(self.probe.timeout_secs)
    }
}

impl fmt::Display for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Monitor configuration:")?;
        writeln!(f, "  Hosts ({}): {}", self.monitor.hosts.len(), self.monitor.hosts.join(", "))?;
        writeln!(f, "  Probe interval: {}ms", self.monitor.probe_interval_ms)?;
        writeln!(f, "  Cycle interval: {}ms", self.monitor.cycle_interval_ms)?;
        writeln!(f, "  Probe command: {} {} 1 <host>", self.probe.program, self.probe.count_flag)?;
        writeln!(f, "  Probe timeout: {}s", self.probe.timeout_secs)?;
        writeln!(f, "  Log file: {}", self.alerts.log_path.display())?;
        writeln!(f, "  Indicator set: {}", self.alerts.indicator_set)?;
        write!(f, "  Console alerts: {}", self.alerts.console)
    }
}
