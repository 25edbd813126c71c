use crate::zram_repo::DEFAULT_SYSFS_ROOT;
use serde::Deserialize;
use std::time::Duration;

/// Runtime settings. Policy thresholds are constants in `policy`, not configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub device: DeviceConfig,
    pub monitoring: MonitoringConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Directory holding mm_stat, bd_stat and the control attributes.
    pub sysfs_root: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sysfs_root: DEFAULT_SYSFS_ROOT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Sleep between report blocks (zraminfo).
    pub report_interval_secs: u64,
    /// Sleep between policy evaluations (zramtracker).
    pub control_interval_secs: u64,
    /// Pause between `writeback=idle` and `idle=all`.
    pub writeback_cooldown_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 60,
            control_interval_secs: 5,
            writeback_cooldown_secs: 60,
        }
    }
}

impl MonitoringConfig {
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn control_interval(&self) -> Duration {
        Duration::from_secs(self.control_interval_secs)
    }

    pub fn writeback_cooldown(&self) -> Duration {
        Duration::from_secs(self.writeback_cooldown_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Lock the controller's pages in RAM so it is never swapped out under the pressure it handles.
    pub lock_pages: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { lock_pages: true }
    }
}

impl AppConfig {
    /// Built-in defaults, or the TOML file named by `CONFIG_FILE` when that variable is set.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => {
                let s = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("config file {}: {}", path, e))?;
                Self::load_from_str(&s)
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.device.sysfs_root.is_empty(),
            "device.sysfs_root must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.report_interval_secs > 0,
            "monitoring.report_interval_secs must be > 0, got {}",
            self.monitoring.report_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.control_interval_secs > 0,
            "monitoring.control_interval_secs must be > 0, got {}",
            self.monitoring.control_interval_secs
        );
        Ok(())
    }
}
