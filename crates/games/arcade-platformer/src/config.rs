use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Env var naming an alternate config file.
pub const CONFIG_ENV: &str = "ARCADE_PLATFORMER_CONFIG";
/// Config file read when the env var is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/platformer.toml";

/// Player movement tuning, in pixels and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub run_speed: f32,
    pub ground_accel: f32,
    pub air_accel: f32,
    pub decel: f32,
    pub jump_buffer: f32,
    pub coyote_time: f32,
    /// Launch velocity; negative is up.
    pub jump_velocity: f32,
    /// Upward speed a released jump is cut to.
    pub jump_cut_velocity: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Most negative vertical velocity allowed.
    pub max_rise_speed: f32,
    pub player_width: i32,
    pub player_height: i32,
    /// How far (px) the player's feet may be from a moving platform's top to
    /// still ride it.
    pub carry_tolerance: i32,
    /// Gap left between a checkpoint's top and the respawned player's feet.
    pub checkpoint_margin: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            run_speed: 210.0,
            ground_accel: 1700.0,
            air_accel: 1300.0,
            decel: 2000.0,
            jump_buffer: 0.15,
            coyote_time: 0.12,
            jump_velocity: -360.0,
            jump_cut_velocity: -120.0,
            gravity: 1000.0,
            max_fall_speed: 980.0,
            max_rise_speed: -1000.0,
            player_width: 32,
            player_height: 42,
            carry_tolerance: 8,
            checkpoint_margin: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub view_width: f32,
    pub view_height: f32,
    /// Fraction of the remaining distance covered per frame.
    pub smoothing: f32,
    /// Where the target sits vertically in the view (0 = top, 1 = bottom).
    pub vertical_anchor: f32,
    pub death_shake_magnitude: f32,
    pub death_shake_duration: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            view_width: 960.0,
            view_height: 540.0,
            smoothing: 0.12,
            vertical_anchor: 0.55,
            death_shake_magnitude: 8.0,
            death_shake_duration: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub max_particles: usize,
    pub gravity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 256,
            gravity: 500.0,
        }
    }
}

/// Top-level platformer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    /// Seed for cosmetic randomness (particles, shake).
    pub seed: u64,
    /// Level text file; the built-in level is used when unset.
    pub level_path: Option<PathBuf>,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            level_path: None,
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<PlatformerConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    PlatformerConfig::default()
                },
            },
            Err(_) => PlatformerConfig::default(),
        }
    }
}
