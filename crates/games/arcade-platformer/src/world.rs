use arcade_core::game_trait::GameEvent;
use arcade_core::input::ActionState;
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::camera::Camera;
use crate::config::PlatformerConfig;
use crate::enemy::Enemy;
use crate::geometry::Rect;
use crate::level::Level;
use crate::particles::{Particle, ParticleSystem};
use crate::physics::{Effects, Player, Surroundings};
use crate::platform::Platform;

/// Outcome of one simulation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    /// True only on the step that reached the goal.
    pub win: bool,
    pub events: Vec<GameEvent>,
}

/// Read-only snapshot handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub solids: &'a [Rect],
    pub coins: &'a [Rect],
    pub spikes: &'a [Rect],
    pub checkpoints: &'a [Rect],
    pub goals: &'a [Rect],
    pub platforms: &'a [Platform],
    pub enemies: &'a [Enemy],
    pub particles: &'a [Particle],
    pub player: &'a Player,
    pub camera: &'a Camera,
    pub score: u32,
    pub size: Vec2,
    pub won: bool,
}

/// Owns every entity of one level session and advances them in a fixed order.
#[derive(Debug, Clone)]
pub struct World {
    solids: Vec<Rect>,
    spikes: Vec<Rect>,
    checkpoints: Vec<Rect>,
    goals: Vec<Rect>,
    coins: Vec<Rect>,
    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
    player: Player,
    camera: Camera,
    particles: ParticleSystem,
    rng: StdRng,
    size: Vec2,
    /// Static solids plus this frame's platform rectangles.
    blockers: Vec<Rect>,
    won: bool,
}

impl World {
    pub fn new(level: Level, config: &PlatformerConfig) -> Self {
        let size = level.size();
        let player = Player::new(level.spawn, config.physics.clone());
        let mut camera = Camera::new(config.camera.clone());
        camera.snap_to(&player.rect, size);
        tracing::info!(
            coins = level.coins.len(),
            enemies = level.enemies.len(),
            platforms = level.platforms.len(),
            "level ready"
        );
        Self {
            blockers: Vec::with_capacity(level.solids.len() + level.platforms.len()),
            solids: level.solids,
            spikes: level.spikes,
            checkpoints: level.checkpoints,
            goals: level.goals,
            coins: level.coins,
            platforms: level.platforms,
            enemies: level.enemies,
            player,
            camera,
            particles: ParticleSystem::new(
                config.particles.max_particles,
                config.particles.gravity,
            ),
            rng: StdRng::seed_from_u64(config.seed),
            size,
            won: false,
        }
    }

    /// Advance one frame: platforms, then enemies, then the player, then
    /// particles and the camera. A won world no longer changes.
    pub fn step(&mut self, dt: f32, input: &ActionState) -> StepResult {
        let mut result = StepResult::default();
        if self.won {
            return result;
        }

        for p in &mut self.platforms {
            p.update(dt);
        }

        self.blockers.clear();
        self.blockers.extend_from_slice(&self.solids);
        self.blockers.extend(self.platforms.iter().map(Platform::rect));

        for e in &mut self.enemies {
            e.update(dt, &self.blockers);
        }

        let world = Surroundings {
            solids: &self.blockers,
            platforms: &self.platforms,
            spikes: &self.spikes,
            enemies: &self.enemies,
            goals: &self.goals,
            checkpoints: &self.checkpoints,
        };
        let mut fx = Effects {
            particles: &mut self.particles,
            camera: &mut self.camera,
            rng: &mut self.rng,
        };
        let report = self
            .player
            .update(dt, input, &world, &mut self.coins, &mut fx);

        if report.coins_collected > 0 {
            result.events.push(GameEvent::ScoreUpdate {
                score: self.player.coins,
            });
        }
        if report.died {
            result.events.push(GameEvent::PlayerDied);
        }
        if report.checkpoint_reached {
            result.events.push(GameEvent::CheckpointReached);
        }

        self.particles.update(dt);
        self.camera
            .update(&self.player.rect, self.size, dt, &mut self.rng);

        if report.win {
            self.won = true;
            result.win = true;
            result.events.push(GameEvent::LevelComplete);
            tracing::info!(coins = self.player.coins, "level complete");
        }
        result
    }

    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            solids: &self.solids,
            coins: &self.coins,
            spikes: &self.spikes,
            checkpoints: &self.checkpoints,
            goals: &self.goals,
            platforms: &self.platforms,
            enemies: &self.enemies,
            particles: self.particles.as_slice(),
            player: &self.player,
            camera: &self.camera,
            score: self.player.coins,
            size: self.size,
            won: self.won,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Direct access for scenario setup.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn coins_left(&self) -> usize {
        self.coins.len()
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}
