use arcade_core::input::{Action, ActionState};
use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::PhysicsConfig;
use crate::enemy::Enemy;
use crate::geometry::{Rect, first_hit, touches_any, whole_pixels};
use crate::particles::ParticleSystem;
use crate::platform::Platform;

/// Read-only geometry the player collides with this frame.
///
/// `solids` must already contain the current platform rectangles so that
/// platforms block like walls during the axis moves.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub solids: &'a [Rect],
    pub platforms: &'a [Platform],
    pub spikes: &'a [Rect],
    pub enemies: &'a [Enemy],
    pub goals: &'a [Rect],
    pub checkpoints: &'a [Rect],
}

/// Cosmetic sinks the player writes into.
pub struct Effects<'a, R> {
    pub particles: &'a mut ParticleSystem,
    pub camera: &'a mut Camera,
    pub rng: &'a mut R,
}

/// What happened to the player during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerReport {
    pub jumped: bool,
    pub coins_collected: u32,
    pub died: bool,
    pub checkpoint_reached: bool,
    pub win: bool,
}

/// The controlled runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    pub on_ground: bool,
    /// Seconds left in which a jump is still honored after leaving the ground.
    pub coyote: f32,
    /// Seconds left in which an early jump press is still remembered.
    pub jump_buffer: f32,
    /// -1 facing left, +1 facing right.
    pub facing: i32,
    pub coins: u32,
    /// Respawn position (top-left).
    pub checkpoint: IVec2,
    tuning: PhysicsConfig,
}

impl Player {
    pub fn new(spawn: IVec2, tuning: PhysicsConfig) -> Self {
        Self {
            rect: Rect::new(spawn.x, spawn.y, tuning.player_width, tuning.player_height),
            vel: Vec2::ZERO,
            on_ground: false,
            coyote: 0.0,
            jump_buffer: 0.0,
            facing: 1,
            coins: 0,
            checkpoint: spawn,
            tuning,
        }
    }

    pub fn tuning(&self) -> &PhysicsConfig {
        &self.tuning
    }

    /// Advance one frame. Steps run in a fixed order; each reads the result
    /// of the previous one.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        input: &ActionState,
        world: &Surroundings<'_>,
        coins: &mut Vec<Rect>,
        fx: &mut Effects<'_, R>,
    ) -> PlayerReport {
        let mut report = PlayerReport::default();

        self.steer(dt, input);

        if input.pressed(Action::Jump) {
            self.jump_buffer = self.tuning.jump_buffer;
        } else {
            self.jump_buffer = (self.jump_buffer - dt).max(0.0);
        }
        if self.on_ground {
            self.coyote = self.tuning.coyote_time;
        } else {
            self.coyote = (self.coyote - dt).max(0.0);
        }
        if self.jump_buffer > 0.0 && self.coyote > 0.0 {
            self.launch(fx);
            report.jumped = true;
        }

        if input.released(Action::Jump) && self.vel.y < self.tuning.jump_cut_velocity {
            self.vel.y = self.tuning.jump_cut_velocity;
        }

        self.vel.y = (self.vel.y + self.tuning.gravity * dt)
            .clamp(self.tuning.max_rise_speed, self.tuning.max_fall_speed);

        self.move_x(whole_pixels(self.vel.x * dt), world.solids, world.platforms);
        self.push_out_of_platforms_x(world.platforms);
        self.move_y(whole_pixels(self.vel.y * dt), world.solids);
        self.ride_platforms(world.platforms);

        report.coins_collected = self.collect(coins, fx);

        if touches_any(&self.rect, world.spikes) || touches_any(&self.rect, world.enemies) {
            self.die(fx);
            report.died = true;
        }

        if touches_any(&self.rect, world.goals) {
            report.win = true;
            return report;
        }

        report.checkpoint_reached = self.touch_checkpoints(world.checkpoints);
        report
    }

    fn steer(&mut self, dt: f32, input: &ActionState) {
        let accel = if self.on_ground {
            self.tuning.ground_accel
        } else {
            self.tuning.air_accel
        };
        let mut ax = 0.0;
        if input.held(Action::MoveLeft) {
            ax -= accel;
            self.facing = -1;
        }
        if input.held(Action::MoveRight) {
            ax += accel;
            self.facing = 1;
        }

        if ax == 0.0 {
            let decel = self.tuning.decel * dt;
            if self.vel.x > 0.0 {
                self.vel.x = (self.vel.x - decel).max(0.0);
            } else if self.vel.x < 0.0 {
                self.vel.x = (self.vel.x + decel).min(0.0);
            }
        } else {
            let max = self.tuning.run_speed;
            self.vel.x = (self.vel.x + ax * dt).clamp(-max, max);
        }
    }

    /// Start a jump. Both grace timers are spent, so one press inside the
    /// coyote window cannot launch twice.
    fn launch<R: Rng>(&mut self, fx: &mut Effects<'_, R>) {
        self.vel.y = self.tuning.jump_velocity;
        self.on_ground = false;
        self.jump_buffer = 0.0;
        self.coyote = 0.0;
        let feet = Vec2::new(self.rect.center().x as f32, self.rect.bottom() as f32);
        fx.particles.jump_dust(fx.rng, feet);
        tracing::debug!(x = self.rect.x, y = self.rect.y, "jump");
    }

    /// Horizontal move against solids. A rising platform that has just
    /// pushed into the player's feet is not a wall; `ride_platforms` lifts
    /// the player onto it.
    fn move_x(&mut self, dx: i32, solids: &[Rect], platforms: &[Platform]) {
        self.rect.x += dx;
        let hit = first_hit(
            &self.rect,
            solids.iter().filter(|r| !self.rising_under_feet(r, platforms)),
        );
        if let Some(hit) = hit {
            if dx > 0 {
                self.rect.set_right(hit.left());
            } else if dx < 0 {
                self.rect.set_left(hit.right());
            }
            self.vel.x = 0.0;
        }
    }

    fn rising_under_feet(&self, r: &Rect, platforms: &[Platform]) -> bool {
        r.top() >= self.rect.bottom() - self.tuning.carry_tolerance
            && platforms.iter().any(|p| p.delta().y < 0 && p.rect() == *r)
    }

    /// Keep a moving platform from sweeping through the player sideways.
    fn push_out_of_platforms_x(&mut self, platforms: &[Platform]) {
        for p in platforms {
            let delta = p.delta();
            let r = p.rect();
            if delta.x == 0 || !self.rect.intersects(&r) {
                continue;
            }
            if delta.x > 0 {
                self.rect.set_right(self.rect.right().min(r.left()));
            } else {
                self.rect.set_left(self.rect.left().max(r.right()));
            }
            self.vel.x = 0.0;
        }
    }

    fn move_y(&mut self, dy: i32, solids: &[Rect]) {
        self.on_ground = false;
        self.rect.y += dy;
        match first_hit(&self.rect, solids) {
            Some(hit) if dy > 0 => {
                self.rect.set_bottom(hit.top());
                self.vel.y = 0.0;
                self.on_ground = true;
            },
            Some(hit) if dy < 0 => {
                self.rect.set_top(hit.bottom());
                self.vel.y = 0.0;
            },
            Some(_) => {},
            None => {
                // resting contact: sub-pixel gravity never moves us into the floor
                if self.vel.y >= 0.0 && touches_any(&self.rect.translated(0, 1), solids) {
                    self.vel.y = 0.0;
                    self.on_ground = true;
                }
            },
        }
    }

    /// Land on, get bumped by, and ride moving platforms.
    fn ride_platforms(&mut self, platforms: &[Platform]) {
        let tol = self.tuning.carry_tolerance;
        let mut carrier: Option<IVec2> = None;
        for p in platforms {
            let delta = p.delta();
            let r = p.rect();
            if delta == IVec2::ZERO || !self.rect.overlaps_x(&r) {
                continue;
            }
            if delta.y < 0 && self.rect.intersects(&r) && self.rect.top() >= r.bottom() - tol {
                self.rect.set_top(r.bottom());
                self.vel.y = 0.0;
            } else if self.vel.y >= 0.0 && (self.rect.bottom() - r.top()).abs() <= tol {
                self.rect.set_bottom(r.top());
                self.vel.y = 0.0;
                self.on_ground = true;
                if carrier.is_none() {
                    carrier = Some(delta);
                }
            }
        }
        if let Some(delta) = carrier {
            self.rect.x += delta.x;
        }
    }

    fn collect<R: Rng>(&mut self, coins: &mut Vec<Rect>, fx: &mut Effects<'_, R>) -> u32 {
        let before = coins.len();
        let rect = self.rect;
        coins.retain(|coin| {
            if !rect.intersects(coin) {
                return true;
            }
            fx.particles.coin_sparkle(fx.rng, coin.center().as_vec2());
            false
        });
        let collected = (before - coins.len()) as u32;
        self.coins += collected;
        collected
    }

    fn die<R: Rng>(&mut self, fx: &mut Effects<'_, R>) {
        fx.camera.death_shake();
        fx.particles.death_burst(fx.rng, self.rect.center().as_vec2());
        tracing::info!(x = self.rect.x, y = self.rect.y, "player died");
        self.respawn();
    }

    /// Teleport to the checkpoint anchor with zero velocity.
    pub fn respawn(&mut self) {
        self.vel = Vec2::ZERO;
        self.rect.set_position(self.checkpoint);
        self.on_ground = false;
        self.coyote = 0.0;
        self.jump_buffer = 0.0;
    }

    /// Returns whether the anchor moved.
    fn touch_checkpoints(&mut self, checkpoints: &[Rect]) -> bool {
        let before = self.checkpoint;
        for r in checkpoints {
            if self.rect.intersects(r) {
                self.checkpoint = IVec2::new(
                    r.x,
                    r.y - self.rect.h - self.tuning.checkpoint_margin,
                );
            }
        }
        if self.checkpoint != before {
            tracing::info!(x = self.checkpoint.x, y = self.checkpoint.y, "checkpoint reached");
            return true;
        }
        false
    }
}
