use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::enemy::Enemy;
use crate::geometry::{Rect, TILE};
use crate::platform::Platform;

/// Spawn used when the grid has no `@`.
pub const FALLBACK_SPAWN: IVec2 = IVec2::new(64, 64);

/// Built-in "Red Runner" stage.
pub const DEFAULT_LEVEL: &[&str] = &[
    "................................................................................",
    "................................................................................",
    ".................................................c............E.................",
    ".................................................XXX............................",
    "...................c............................................c...............",
    "..............XXX..XXX..............c...............E...........XXX.............",
    "@..................................XXXXX...........................c............",
    "XXXX.................====....................................XXXXXXX............",
    "....XX....c..............................................c...........c..........",
    "......XX..............................................XXXXXXX...................",
    ".........XX..............!.......................c......................G.......",
    "............XX.....^^^^^XXXXXX..............XXXXXXX.............^^^^^XXXXXX.....",
    "...............XX....................c..........................................",
    "..................XX................XXXXXXX.....................................",
    ".....................XX........................................................",
    "........................XXXXXXXXXXXX.............................||||...........",
    ".................................................................||||...........",
    "..................c....................c.........................||||...........",
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
];

/// One cell of the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Solid,
    Coin,
    Spike,
    HorizontalPlatform,
    VerticalPlatform,
    Spawn,
    Checkpoint,
    Goal,
    Enemy,
}

impl Tile {
    /// Unknown symbols are empty space.
    pub fn from_symbol(c: char) -> Tile {
        match c {
            'X' => Tile::Solid,
            'c' => Tile::Coin,
            '^' => Tile::Spike,
            '=' => Tile::HorizontalPlatform,
            '|' => Tile::VerticalPlatform,
            '@' => Tile::Spawn,
            '!' => Tile::Checkpoint,
            'G' => Tile::Goal,
            'E' => Tile::Enemy,
            _ => Tile::Empty,
        }
    }
}

#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read level: {e}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A parsed level: the immutable grid plus the entities it spawns, each kind
/// in grid order (row-major).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Tile data stored row-major (y * width + x).
    pub tiles: Vec<Tile>,
    pub solids: Vec<Rect>,
    pub coins: Vec<Rect>,
    pub spikes: Vec<Rect>,
    pub checkpoints: Vec<Rect>,
    pub goals: Vec<Rect>,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    /// Player spawn (top-left, pixels).
    pub spawn: IVec2,
}

impl Level {
    /// Parse a grid of rows. Short rows are padded with empty cells; the level
    /// is never rejected.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Level {
        let height = rows.len();
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);

        let mut level = Level {
            width,
            height,
            tiles: Vec::with_capacity(width * height),
            solids: Vec::new(),
            coins: Vec::new(),
            spikes: Vec::new(),
            checkpoints: Vec::new(),
            goals: Vec::new(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            spawn: FALLBACK_SPAWN,
        };

        for (ty, row) in rows.iter().enumerate() {
            let mut cells = row.as_ref().chars().map(Tile::from_symbol);
            for tx in 0..width {
                let tile = cells.next().unwrap_or(Tile::Empty);
                level.tiles.push(tile);
                level.place(tile, tx as i32 * TILE, ty as i32 * TILE);
            }
        }
        level
    }

    /// Parse newline-separated text, e.g. a level file's contents.
    pub fn from_text(text: &str) -> Level {
        let rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        Self::parse(&rows)
    }

    pub fn load(path: &Path) -> Result<Level, LevelError> {
        let text = std::fs::read_to_string(path)?;
        let level = Self::from_text(&text);
        tracing::info!(
            path = %path.display(),
            width = level.width,
            height = level.height,
            "loaded level"
        );
        Ok(level)
    }

    pub fn builtin() -> Level {
        Self::parse(DEFAULT_LEVEL)
    }

    fn place(&mut self, tile: Tile, rx: i32, ry: i32) {
        const THIRD: i32 = TILE / 3;
        const HALF: i32 = TILE / 2;
        match tile {
            Tile::Empty => {},
            Tile::Solid => self.solids.push(Rect::new(rx, ry, TILE, TILE)),
            Tile::Coin => self
                .coins
                .push(Rect::new(rx + THIRD, ry + THIRD, THIRD, THIRD)),
            Tile::Spike => self.spikes.push(Rect::new(rx, ry + HALF, TILE, HALF)),
            Tile::HorizontalPlatform => self.platforms.push(Platform::horizontal(rx, ry)),
            Tile::VerticalPlatform => self.platforms.push(Platform::vertical(rx, ry)),
            Tile::Spawn => self.spawn = IVec2::new(rx, ry - 12),
            Tile::Checkpoint => self.checkpoints.push(Rect::new(rx, ry, TILE, TILE)),
            Tile::Goal => self.goals.push(Rect::new(rx, ry, TILE, TILE)),
            Tile::Enemy => self.enemies.push(Enemy::spawn(rx, ry)),
        }
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Tile::Empty;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    /// Level extent in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            (self.width as i32 * TILE) as f32,
            (self.height as i32 * TILE) as f32,
        )
    }
}
