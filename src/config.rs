use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Mirror log lines to stdout (plain-text mode only)
    #[serde(default)]
    pub log_to_stdout: bool,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Upper bound on each lock acquisition made by the ledger services
    pub lock_timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5_000,
        }
    }
}

impl LedgerConfig {
    #[inline]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "lockstep-ledger.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            log_to_stdout: false,
            ledger: LedgerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`.
    pub fn load(env: &str) -> anyhow::Result<Self> {
        Self::from_file(format!("config/{}.yaml", env))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).context("Failed to parse config yaml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.ledger.lock_timeout_ms == 0 {
            bail!("ledger.lock_timeout_ms must be greater than zero");
        }
        if !matches!(self.rotation.as_str(), "hourly" | "daily" | "never") {
            bail!("rotation must be one of hourly, daily, never (got {})", self.rotation);
        }
        Ok(())
    }
}
