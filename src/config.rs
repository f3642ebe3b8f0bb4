//! YAML configuration for the world, logging and the demo game.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ecs::{CascadePolicy, ComponentSchemaPolicy, EntityIdPolicy, EventBus};

fn default_max_event_passes() -> usize {
    EventBus::DEFAULT_MAX_PASSES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frames() -> u64 {
    1_800
}

fn default_fps() -> f64 {
    60.0
}

fn default_seed() -> u64 {
    7
}

fn default_wave_cooldown() -> f64 {
    2.0
}

fn default_cooldown_step() -> f64 {
    0.05
}

fn default_min_cooldown() -> f64 {
    0.5
}

fn default_player_health() -> f64 {
    20.0
}

fn default_path() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [20.0, 10.0]]
}

fn default_projectile_speed() -> f64 {
    8.0
}

fn default_projectile_lifetime() -> f64 {
    3.0
}

fn default_tower_damage() -> f64 {
    1.0
}

fn default_tower_range() -> f64 {
    5.0
}

fn default_tower_cooldown() -> f64 {
    3.0
}

fn default_towers() -> Vec<TowerConfig> {
    vec![
        TowerConfig {
            position: [5.0, 2.0],
            damage: 2.0,
            range: 7.0,
            cooldown: 2.0,
        },
        TowerConfig {
            position: [12.0, 6.0],
            damage: 3.0,
            range: 10.0,
            cooldown: 1.0,
        },
    ]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub entity_ids: EntityIdPolicy,
    pub component_schema: ComponentSchemaPolicy,
    pub event_cascade: CascadePolicy,
    #[serde(default = "default_max_event_passes")]
    pub max_event_passes: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_ids: EntityIdPolicy::default(),
            component_schema: ComponentSchemaPolicy::default(),
            event_cascade: CascadePolicy::default(),
            max_event_passes: default_max_event_passes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_frames")]
    pub frames: u64,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Seconds between the first two spawns.
    #[serde(default = "default_wave_cooldown")]
    pub wave_cooldown: f64,
    /// Seconds shaved off the cooldown after every spawn.
    #[serde(default = "default_cooldown_step")]
    pub cooldown_step: f64,
    #[serde(default = "default_min_cooldown")]
    pub min_cooldown: f64,
    #[serde(default = "default_player_health")]
    pub player_health: f64,
    #[serde(default)]
    pub starting_money: f64,
    #[serde(default = "default_path")]
    pub path: Vec<[f64; 2]>,
    /// Units per second.
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: f64,
    /// Seconds a projectile flies before it is discarded.
    #[serde(default = "default_projectile_lifetime")]
    pub projectile_lifetime: f64,
    #[serde(default = "default_towers")]
    pub towers: Vec<TowerConfig>,
}

/// A tower placed when the world is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerConfig {
    pub position: [f64; 2],
    #[serde(default = "default_tower_damage")]
    pub damage: f64,
    #[serde(default = "default_tower_range")]
    pub range: f64,
    /// Seconds between shots.
    #[serde(default = "default_tower_cooldown")]
    pub cooldown: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            fps: default_fps(),
            seed: default_seed(),
            wave_cooldown: default_wave_cooldown(),
            cooldown_step: default_cooldown_step(),
            min_cooldown: default_min_cooldown(),
            player_health: default_player_health(),
            starting_money: 0.0,
            path: default_path(),
            projectile_speed: default_projectile_speed(),
            projectile_lifetime: default_projectile_lifetime(),
            towers: default_towers(),
        }
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Config> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}
