use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Tile edge length in pixels.
pub const TILE: i32 = 48;

/// Axis-aligned rectangle in whole pixels. `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: IVec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Center rounded toward the top-left, like integer pixel rects do.
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Whether the horizontal spans overlap (ignoring y).
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// Anything with a bounding rectangle that collision queries can test.
pub trait Collidable {
    fn bounds(&self) -> Rect;
}

impl Collidable for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// First collidable (in iteration order) overlapping `rect`.
pub fn first_hit<'a, C>(rect: &Rect, others: impl IntoIterator<Item = &'a C>) -> Option<Rect>
where
    C: Collidable + 'a,
{
    others
        .into_iter()
        .map(Collidable::bounds)
        .find(|r| rect.intersects(r))
}

/// Whether `rect` overlaps any of `others`.
pub fn touches_any<'a, C>(rect: &Rect, others: impl IntoIterator<Item = &'a C>) -> bool
where
    C: Collidable + 'a,
{
    first_hit(rect, others).is_some()
}

/// Truncate a fractional pixel displacement toward zero.
pub fn whole_pixels(d: f32) -> i32 {
    if d.is_finite() { d.trunc() as i32 } else { 0 }
}
