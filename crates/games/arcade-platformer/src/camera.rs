use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::geometry::{Rect, whole_pixels};

/// Smoothed follow camera with screen shake. Purely cosmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left of the view in level pixels.
    pub pos: Vec2,
    config: CameraConfig,
    shake_magnitude: f32,
    shake_timer: f32,
    shake_duration: f32,
    /// Jitter chosen for the current frame.
    jitter: Vec2,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            config,
            shake_magnitude: 0.0,
            shake_timer: 0.0,
            shake_duration: 0.0,
            jitter: Vec2::ZERO,
        }
    }

    /// Where the view's top-left should be to frame `target`, kept inside the level.
    pub fn desired(&self, target: &Rect, level_size: Vec2) -> Vec2 {
        let center = target.center().as_vec2();
        let tx = center.x - self.config.view_width / 2.0;
        let ty = center.y - self.config.view_height * self.config.vertical_anchor;
        Vec2::new(
            tx.min(level_size.x - self.config.view_width).max(0.0),
            ty.min(level_size.y - self.config.view_height).max(0.0),
        )
    }

    /// Ease toward the target and advance the shake timer by `dt`.
    pub fn update(&mut self, target: &Rect, level_size: Vec2, dt: f32, rng: &mut impl Rng) {
        let desired = self.desired(target, level_size);
        self.pos += (desired - self.pos) * self.config.smoothing;

        if self.shake_timer > 0.0 {
            self.shake_timer = (self.shake_timer - dt).max(0.0);
        }
        if self.shake_timer <= 0.0 {
            self.shake_magnitude = 0.0;
            self.shake_duration = 0.0;
            self.jitter = Vec2::ZERO;
            return;
        }

        let m = self.shake_magnitude * self.shake_fraction();
        self.jitter = Vec2::new(rng.random_range(-m..=m), rng.random_range(-m..=m));
    }

    /// Raise the shake ceiling. Shakes never stack additively.
    pub fn add_shake(&mut self, magnitude: f32, duration: f32) {
        self.shake_magnitude = self.shake_magnitude.max(magnitude);
        self.shake_timer = self.shake_timer.max(duration);
        self.shake_duration = self.shake_duration.max(self.shake_timer);
    }

    /// Shake the player's death calls for.
    pub fn death_shake(&mut self) {
        self.add_shake(self.config.death_shake_magnitude, self.config.death_shake_duration);
    }

    /// Remaining shake time as a fraction of the shake's duration.
    pub fn shake_fraction(&self) -> f32 {
        if self.shake_duration <= 0.0 {
            return 0.0;
        }
        (self.shake_timer / self.shake_duration).clamp(0.0, 1.0)
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_timer > 0.0
    }

    pub fn shake_magnitude(&self) -> f32 {
        self.shake_magnitude
    }

    pub fn jitter(&self) -> Vec2 {
        self.jitter
    }

    /// Project a level rectangle into view space, including this frame's jitter.
    pub fn apply(&self, rect: &Rect) -> Rect {
        let offset = self.jitter - self.pos;
        rect.translated(whole_pixels(offset.x), whole_pixels(offset.y))
    }

    /// Project a level point into view space.
    pub fn apply_point(&self, p: Vec2) -> Vec2 {
        p - self.pos + self.jitter
    }

    /// Jump straight to the desired position, e.g. on level start.
    pub fn snap_to(&mut self, target: &Rect, level_size: Vec2) {
        self.pos = self.desired(target, level_size);
    }

    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.config.view_width, self.config.view_height)
    }
}
