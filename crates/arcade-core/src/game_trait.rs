use serde::{Deserialize, Serialize};

use crate::input::ActionState;

/// Core trait implemented by every arcade game that runs in-process.
///
/// The client owns the terminal, input devices and frame clock; the game
/// only advances its own simulation and reports what happened.
pub trait ArcadeGame {
    /// Game metadata shown in title bars and logs.
    fn metadata(&self) -> GameMetadata;

    /// Called each frame with the clamped frame delta. Returns the events
    /// produced by this frame.
    fn update(&mut self, dt: f32, input: &ActionState) -> Vec<GameEvent>;

    /// Freeze the simulation. `update` becomes a no-op until `resume`.
    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the level/session has reached its terminal state.
    fn is_complete(&self) -> bool;

    /// Current score (coins for Red Runner).
    fn score(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate { score: u32 },
    PlayerDied,
    CheckpointReached,
    LevelComplete,
}

/// Generates the pause bookkeeping shared by games that keep a `paused: bool`
/// field: `pause`, `resume`, `is_paused`.
#[macro_export]
macro_rules! arcade_game_pause_boilerplate {
    () => {
        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}
