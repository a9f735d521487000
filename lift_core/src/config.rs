//! Configuration file support for liftplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftplan/config.toml`.
//! Every field has a default, so partial files are fine.

use crate::{CatalogExercise, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub guardrails: GuardrailConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Data export configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
        }
    }
}

/// Load projection parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Rolling load used when no week has been logged yet
    #[serde(default = "default_seed_load_kg")]
    pub seed_load_kg: f64,

    #[serde(default = "default_weekly_growth")]
    pub weekly_growth: f64,

    #[serde(default = "default_deload_factor")]
    pub deload_factor: f64,

    /// Emitted targets never drop below this
    #[serde(default = "default_min_load_kg")]
    pub min_load_kg: f64,

    #[serde(default = "default_min_weekly_zone2_minutes")]
    pub min_weekly_zone2_minutes: u32,

    #[serde(default = "default_min_conditioning_sessions")]
    pub min_conditioning_sessions: u32,

    #[serde(default = "default_minutes_per_conditioning_session")]
    pub minutes_per_conditioning_session: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            seed_load_kg: default_seed_load_kg(),
            weekly_growth: default_weekly_growth(),
            deload_factor: default_deload_factor(),
            min_load_kg: default_min_load_kg(),
            min_weekly_zone2_minutes: default_min_weekly_zone2_minutes(),
            min_conditioning_sessions: default_min_conditioning_sessions(),
            minutes_per_conditioning_session: default_minutes_per_conditioning_session(),
        }
    }
}

/// Guardrail post-processor parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Program-wide minimum of conditioning blocks under the PCOS guardrail
    #[serde(default = "default_min_conditioning_blocks")]
    pub min_conditioning_blocks: usize,

    #[serde(default = "default_zone2_block_minutes")]
    pub zone2_block_minutes: u32,

    #[serde(default = "default_recovery_block_minutes")]
    pub recovery_block_minutes: u32,

    /// Largest single duration cut applied to an accessory block
    #[serde(default = "default_trim_step_minutes")]
    pub trim_step_minutes: u32,

    #[serde(default = "default_accessory_floor_minutes")]
    pub accessory_floor_minutes: u32,

    #[serde(default = "default_accessory_floor_sets")]
    pub accessory_floor_sets: u32,

    #[serde(default = "default_minutes_per_trimmed_set")]
    pub minutes_per_trimmed_set: u32,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            min_conditioning_blocks: default_min_conditioning_blocks(),
            zone2_block_minutes: default_zone2_block_minutes(),
            recovery_block_minutes: default_recovery_block_minutes(),
            trim_step_minutes: default_trim_step_minutes(),
            accessory_floor_minutes: default_accessory_floor_minutes(),
            accessory_floor_sets: default_accessory_floor_sets(),
            minutes_per_trimmed_set: default_minutes_per_trimmed_set(),
        }
    }
}

/// Extra exercise catalog entries merged over the built-in catalog
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub custom: Vec<CatalogExercise>,
}

// Default value functions
fn default_export_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(std::env::temp_dir)
    });
    base.join("liftplan")
}

fn default_seed_load_kg() -> f64 {
    3200.0
}

fn default_weekly_growth() -> f64 {
    1.025
}

fn default_deload_factor() -> f64 {
    0.82
}

fn default_min_load_kg() -> f64 {
    2500.0
}

fn default_min_weekly_zone2_minutes() -> u32 {
    90
}

fn default_min_conditioning_sessions() -> u32 {
    2
}

fn default_minutes_per_conditioning_session() -> u32 {
    30
}

fn default_min_conditioning_blocks() -> usize {
    2
}

fn default_zone2_block_minutes() -> u32 {
    15
}

fn default_recovery_block_minutes() -> u32 {
    5
}

fn default_trim_step_minutes() -> u32 {
    5
}

fn default_accessory_floor_minutes() -> u32 {
    10
}

fn default_accessory_floor_sets() -> u32 {
    2
}

fn default_minutes_per_trimmed_set() -> u32 {
    2
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(std::env::temp_dir)
        });
        base.join("liftplan").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values that would make the heuristics meaningless
    pub fn validate(&self) -> Result<()> {
        let p = &self.progression;
        if !(p.weekly_growth.is_finite() && p.weekly_growth > 0.0) {
            return Err(Error::Config(format!(
                "progression.weekly_growth must be positive, got {}",
                p.weekly_growth
            )));
        }
        if !(p.deload_factor.is_finite() && p.deload_factor > 0.0 && p.deload_factor <= 1.0) {
            return Err(Error::Config(format!(
                "progression.deload_factor must be in (0, 1], got {}",
                p.deload_factor
            )));
        }
        if self.guardrails.trim_step_minutes == 0 {
            return Err(Error::Config(
                "guardrails.trim_step_minutes must be at least 1".into(),
            ));
        }
        if self.guardrails.accessory_floor_sets == 0 {
            return Err(Error::Config(
                "guardrails.accessory_floor_sets must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
