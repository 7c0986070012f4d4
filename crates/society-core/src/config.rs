//! Configuration System
//!
//! Loads tuning parameters from a TOML file. Every section falls back to its
//! defaults, so a file only needs to name the values it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "society.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocietyConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub culture: CultureConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub social: SocialConfig,
}

/// Run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub initial_agents: usize,
    pub ticks: u64,
    pub snapshot_interval: u64,
    /// Milliseconds between pushed ticks in live mode
    pub cadence_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_agents: 8,
            ticks: 100,
            snapshot_interval: 10,
            cadence_ms: 500,
        }
    }
}

/// Random walk and pressure thresholds of the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub initial_resources: u32,
    pub initial_stress: f32,
    /// Resources move by at most this much per tick, either direction
    pub resource_swing: i64,
    pub stress_swing: f32,
    pub event_probability: f64,
    pub max_recent_events: usize,
    /// Below this many resources agents grow sadder
    pub scarcity_threshold: u32,
    pub scarcity_sadness: f32,
    /// Above this stress level agents grow sadder
    pub stress_threshold: f32,
    pub stress_sadness: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            initial_resources: 1000,
            initial_stress: 0.2,
            resource_swing: 50,
            stress_swing: 0.05,
            event_probability: 0.1,
            max_recent_events: 5,
            scarcity_threshold: 200,
            scarcity_sadness: 0.1,
            stress_threshold: 0.7,
            stress_sadness: 0.05,
        }
    }
}

/// Popularity dynamics of artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CultureConfig {
    pub initial_popularity: f32,
    pub spread_multiplier: f32,
    /// Spread multiplier noise, uniform in +/- this amount
    pub spread_noise: f32,
    pub decay_factor: f32,
    /// Artifacts at or below this popularity are forgotten
    pub forget_threshold: f32,
    pub trending_threshold: f32,
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            initial_popularity: 1.0,
            spread_multiplier: 1.05,
            spread_noise: 0.01,
            decay_factor: 0.99,
            forget_threshold: 0.1,
            trending_threshold: 1.5,
        }
    }
}

/// Per-tick probability table for the agent routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub role_assignment: f64,
    pub imitation: f64,
    pub artifact_creation: f64,
    pub rule_authorship: f64,
    pub synthesis: f64,
    pub revolution_check: f64,
    /// Joy and sadness drift by at most this much per tick
    pub emotion_drift: f32,
    /// Agents dream when their age is a multiple of this
    pub dream_interval: u64,
    pub dream_empathy_gain: f32,
    pub reflection: f64,
    pub inheritance: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            role_assignment: 0.1,
            imitation: 0.05,
            artifact_creation: 0.1,
            rule_authorship: 0.05,
            synthesis: 0.05,
            revolution_check: 0.02,
            emotion_drift: 0.05,
            dream_interval: 10,
            dream_empathy_gain: 0.2,
            reflection: 0.1,
            inheritance: 0.05,
        }
    }
}

/// Removal, inheritance, and revolution thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Agents sadder than this are removed
    pub removal_sadness: f32,
    pub inherited_memories: usize,
    pub inherited_artifacts: usize,
    /// Share of the living population that must carry an artifact
    pub revolution_share: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            removal_sadness: 0.95,
            inherited_memories: 5,
            inherited_artifacts: 2,
            revolution_share: 0.6,
        }
    }
}

/// Relationship strengthening and fading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub interaction_bond: f32,
    pub bond_decay: f32,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            interaction_bond: 0.1,
            bond_decay: 0.99,
        }
    }
}

impl SocietyConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a path, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
