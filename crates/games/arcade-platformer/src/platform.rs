use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::{Collidable, Rect, TILE, whole_pixels};

/// Oscillation amplitude of a horizontal (`=`) platform, in pixels.
pub const HORIZONTAL_DISTANCE: f32 = 80.0;
/// Angular speed of a horizontal platform, in radians per second.
pub const HORIZONTAL_SPEED: f32 = 1.2;
/// Oscillation amplitude of a vertical (`|`) platform, in pixels.
pub const VERTICAL_DISTANCE: f32 = 90.0;
/// Angular speed of a vertical platform, in radians per second.
pub const VERTICAL_SPEED: f32 = 1.0;
/// Platform slab thickness.
pub const THICKNESS: i32 = TILE / 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn unit(self) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::X,
            Axis::Vertical => Vec2::Y,
        }
    }
}

/// A slab that oscillates sinusoidally along one axis around its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    base: Vec2,
    axis: Axis,
    distance: f32,
    speed: f32,
    phase: f32,
    rect: Rect,
    prev: Rect,
}

impl Platform {
    pub fn new(rect: Rect, axis: Axis, distance: f32, speed: f32) -> Self {
        Self {
            base: rect.position().as_vec2(),
            axis,
            distance,
            speed,
            phase: 0.0,
            rect,
            prev: rect,
        }
    }

    /// Platform spawned by a `=` tile at pixel `(x, y)`.
    pub fn horizontal(x: i32, y: i32) -> Self {
        Self::new(
            Rect::new(x, y, TILE, THICKNESS),
            Axis::Horizontal,
            HORIZONTAL_DISTANCE,
            HORIZONTAL_SPEED,
        )
    }

    /// Platform spawned by a `|` tile at pixel `(x, y)`; inset from the cell sides.
    pub fn vertical(x: i32, y: i32) -> Self {
        Self::new(
            Rect::new(x + 6, y, TILE - 12, THICKNESS),
            Axis::Vertical,
            VERTICAL_DISTANCE,
            VERTICAL_SPEED,
        )
    }

    /// Advance the oscillation. The previous rectangle is captured first so
    /// `delta` reports exactly this frame's motion.
    pub fn update(&mut self, dt: f32) {
        self.prev = self.rect;
        self.phase += dt * self.speed;
        let p = (self.phase.sin() + 1.0) / 2.0;
        let offset = self.axis.unit() * self.distance * (2.0 * p - 1.0);
        let pos = self.base + offset;
        self.rect
            .set_position(IVec2::new(whole_pixels(pos.x), whole_pixels(pos.y)));
    }

    /// Displacement since the previous `update`, in whole pixels.
    pub fn delta(&self) -> IVec2 {
        self.rect.position() - self.prev.position()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_moving(&self) -> bool {
        self.delta() != IVec2::ZERO
    }
}

impl Collidable for Platform {
    fn bounds(&self) -> Rect {
        self.rect
    }
}
