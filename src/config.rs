use crate::error::ConfigError;
use crate::grid::{Grid, GRID_SIZE};
use crate::obstacle::OverlapPolicy;
use crate::simulator::{SimulationMode, SimulatorOptions};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_size")]
    pub size: i32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

#[derive(Debug, Deserialize, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub mode: SimulationMode,
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
    #[serde(default)]
    pub collision_check: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlannerConfig {
    /// JSON file holding a planner response (`{"path": [...], "cost": ...}`)
    #[serde(default = "default_response_path")]
    pub response_path: String,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default filter for env_logger; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_size() -> i32 { GRID_SIZE }
fn default_cell_size() -> f32 { 32.0 }
fn default_response_path() -> String { "planner_response.json".to_string() }
fn default_window_title() -> String { "Algorithm Simulator".to_string() }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_log_level() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            cell_size: default_cell_size(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            response_path: default_response_path(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration file read from the working directory
pub const CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Read a configuration file. `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Settle the outcome of `read`, falling back to defaults and logging why.
    /// Call after the logger is installed so the warning is visible.
    pub fn or_default(loaded: Result<Option<Self>, ConfigError>) -> Self {
        match loaded {
            Ok(Some(config)) => {
                info!("loaded configuration from {}", CONFIG_FILE);
                config
            }
            Ok(None) => {
                info!("no {} found, using default configuration", CONFIG_FILE);
                Config::default()
            }
            Err(e) => {
                warn!("{}; using default configuration", e);
                Config::default()
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        // footprints need at least a 3x3 interior; column letters stop at 'Z'
        if config.grid.size < 3 || config.grid.size > 26 {
            return Err(ConfigError::Invalid(format!(
                "grid.size must be between 3 and 26, got {}",
                config.grid.size
            )));
        }
        Ok(config)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid.size)
    }

    pub fn simulator_options(&self) -> SimulatorOptions {
        SimulatorOptions {
            mode: self.simulation.mode,
            overlap_policy: self.simulation.overlap_policy,
            collision_check: self.simulation.collision_check,
        }
    }
}
