use serde::{Deserialize, Serialize};

use crate::geometry::{Collidable, Rect, TILE, touches_any, whole_pixels};

/// Patrol speed in pixels per second.
pub const PATROL_SPEED: f32 = 120.0;

/// A walker that patrols horizontally and turns around at walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    rect: Rect,
    speed: f32,
    dir: i32,
}

impl Enemy {
    /// Enemy spawned by an `E` tile at pixel `(x, y)`, resting on the cell floor.
    pub fn spawn(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x + 6, y + 8, TILE - 8, TILE - 8),
            speed: PATROL_SPEED,
            dir: 1,
        }
    }

    /// Step horizontally; on hitting a solid, reverse and re-apply the step
    /// once with the new sign.
    pub fn update(&mut self, dt: f32, solids: &[Rect]) {
        self.rect.x += self.step(dt);
        if touches_any(&self.rect, solids) {
            self.dir = -self.dir;
            self.rect.x += self.step(dt);
        }
    }

    fn step(&self, dt: f32) -> i32 {
        whole_pixels(self.speed * self.dir as f32 * dt)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// +1 when walking right, -1 when walking left.
    pub fn facing(&self) -> i32 {
        self.dir
    }
}

impl Collidable for Enemy {
    fn bounds(&self) -> Rect {
        self.rect
    }
}
