pub mod camera;
pub mod config;
pub mod enemy;
pub mod geometry;
pub mod level;
pub mod particles;
pub mod physics;
pub mod platform;
pub mod world;

use arcade_core::arcade_game_pause_boilerplate;
use arcade_core::game_trait::{ArcadeGame, GameEvent, GameMetadata};
use arcade_core::input::ActionState;

use config::PlatformerConfig;
use level::{Level, LevelError};
use world::{World, WorldView};

/// Coarse session state, as seen by the client loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Won,
}

/// The Red Runner game: one level session.
pub struct RedRunner {
    world: World,
    paused: bool,
}

impl RedRunner {
    pub fn new(level: Level, config: &PlatformerConfig) -> Self {
        Self {
            world: World::new(level, config),
            paused: false,
        }
    }

    /// Build from config, reading `level_path` when set.
    pub fn from_config(config: &PlatformerConfig) -> Result<Self, LevelError> {
        let level = match &config.level_path {
            Some(path) => Level::load(path)?,
            None => Level::builtin(),
        };
        Ok(Self::new(level, config))
    }

    pub fn phase(&self) -> Phase {
        if self.world.is_won() {
            Phase::Won
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    pub fn view(&self) -> WorldView<'_> {
        self.world.view()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for RedRunner {
    fn default() -> Self {
        Self::new(Level::builtin(), &PlatformerConfig::default())
    }
}

impl ArcadeGame for RedRunner {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Red Runner".to_string(),
            description: "Run, jump, grab the coins and reach the flag.".to_string(),
        }
    }

    fn update(&mut self, dt: f32, input: &ActionState) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        self.world.step(dt, input).events
    }

    arcade_game_pause_boilerplate!();

    fn is_complete(&self) -> bool {
        self.world.is_won()
    }

    fn score(&self) -> u32 {
        self.world.player().coins
    }
}
