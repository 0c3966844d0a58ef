use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::baseline::BaselineConfig;
use crate::chart::ChartConfig;
use crate::logging::{LogConfig, LogFormat, LogLevel};
use crate::models::Schedule;
use crate::source::{DataSettings, DataSource};
use crate::timefmt;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Default wake/sleep schedule
    pub schedule: Schedule,

    /// Baseline model constants
    pub baseline: BaselineConfig,

    /// Chart shaping settings
    pub chart: ChartConfig,

    /// Timeline data source
    pub data: DataSettings,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            schedule: Schedule::default(),
            baseline: BaselineConfig::default(),
            chart: ChartConfig::default(),
            data: DataSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Keys accepted by `get_value` / `set_value`
pub const SETTABLE_KEYS: &[&str] = &[
    "schedule.wake_hour",
    "schedule.sleep_hour",
    "chart.stride",
    "chart.origin_hour",
    "chart.width_px",
    "data.source",
    "data.fallback_to_mock",
    "logging.level",
    "logging.format",
];

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        info!(path = %path.as_ref().display(), "Configuration saved");
        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".brainrs")
            .join("config.toml")
    }

    /// Load configuration from `path`, or defaults if the file does not exist
    pub fn load_or_default_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            debug!(path = %path.as_ref().display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_or_default_at(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "Invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<()> {
        self.schedule
            .validate()
            .with_context(|| "Invalid [schedule] section")?;
        self.baseline
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| "Invalid [baseline] section")?;
        self.chart
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| "Invalid [chart] section")?;
        Ok(())
    }

    /// Read a setting by dotted key
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "schedule.wake_hour" => self.schedule.wake_hour.to_string(),
            "schedule.sleep_hour" => self.schedule.sleep_hour.to_string(),
            "chart.stride" => self.chart.stride.to_string(),
            "chart.origin_hour" => self.chart.origin_hour.to_string(),
            "chart.width_px" => self.chart.width_px.to_string(),
            "data.source" => match &self.data.source {
                DataSource::Mock => "mock".to_string(),
                DataSource::File { path } => path.display().to_string(),
            },
            "data.fallback_to_mock" => self.data.fallback_to_mock.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            "logging.format" => format!("{:?}", self.logging.format).to_lowercase(),
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
        };
        Ok(value)
    }

    /// Update a setting by dotted key, then re-validate
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();

        match key {
            "schedule.wake_hour" => updated.schedule.wake_hour = timefmt::parse_hour(value)?,
            "schedule.sleep_hour" => updated.schedule.sleep_hour = timefmt::parse_hour(value)?,
            "chart.stride" => {
                updated.chart.stride = value
                    .parse::<usize>()
                    .with_context(|| format!("Invalid stride: {}", value))?
            }
            "chart.origin_hour" => updated.chart.origin_hour = timefmt::parse_hour(value)?,
            "chart.width_px" => {
                updated.chart.width_px = value
                    .parse::<f64>()
                    .with_context(|| format!("Invalid width: {}", value))?
            }
            "data.source" => {
                updated.data.source = if value.eq_ignore_ascii_case("mock") {
                    DataSource::Mock
                } else {
                    DataSource::File {
                        path: PathBuf::from(value),
                    }
                }
            }
            "data.fallback_to_mock" => {
                updated.data.fallback_to_mock = value
                    .parse::<bool>()
                    .with_context(|| format!("Expected true or false, got {}", value))?
            }
            "logging.level" => {
                updated.logging.level = value.parse::<LogLevel>().map_err(anyhow::Error::msg)?
            }
            "logging.format" => {
                updated.logging.format = value.parse::<LogFormat>().map_err(anyhow::Error::msg)?
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
        }

        updated.validate()?;
        updated.metadata.updated_at = Utc::now();
        *self = updated;
        Ok(())
    }
}
