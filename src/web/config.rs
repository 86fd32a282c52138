use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::attitude::{GroundTarget, PointingMode, PowerModel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub satellite: SatelliteConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub targets: Vec<GroundTarget>,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub name: Option<String>,
    pub tle_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tick_period", deserialize_with = "deserialize_duration")]
    pub tick_period: Duration,
    #[serde(
        default = "default_reselect_period",
        deserialize_with = "deserialize_duration"
    )]
    pub target_reselect_period: Duration,
    #[serde(default = "default_idle_power_w")]
    pub idle_power_w: f64,
    #[serde(default = "default_heading_rate_coeff")]
    pub heading_rate_coeff: f64,
    #[serde(default = "default_tilt_rate_coeff")]
    pub tilt_rate_coeff: f64,
    #[serde(default = "default_focus_overhead_w")]
    pub focus_overhead_w: f64,
    #[serde(default = "default_initial_mode")]
    pub initial_mode: PointingMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period: default_tick_period(),
            target_reselect_period: default_reselect_period(),
            idle_power_w: default_idle_power_w(),
            heading_rate_coeff: default_heading_rate_coeff(),
            tilt_rate_coeff: default_tilt_rate_coeff(),
            focus_overhead_w: default_focus_overhead_w(),
            initial_mode: default_initial_mode(),
        }
    }
}

impl EngineConfig {
    pub fn power_model(&self) -> PowerModel {
        PowerModel {
            idle_power_w: self.idle_power_w,
            heading_rate_coeff: self.heading_rate_coeff,
            tilt_rate_coeff: self.tilt_rate_coeff,
            focus_overhead_w: self.focus_overhead_w,
        }
    }
}

fn default_tick_period() -> Duration {
    Duration::from_secs(5)
}

fn default_reselect_period() -> Duration {
    Duration::from_secs(60)
}

fn default_idle_power_w() -> f64 {
    10.0
}

fn default_heading_rate_coeff() -> f64 {
    0.4
}

fn default_tilt_rate_coeff() -> f64 {
    0.6
}

fn default_focus_overhead_w() -> f64 {
    5.0
}

fn default_initial_mode() -> PointingMode {
    PointingMode::Lookdown
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayConfig {
    /// Where to write the camera-view KML file; omit to serve it over
    /// HTTP only.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5003".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    SetMode,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }
}
