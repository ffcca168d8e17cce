use std::io::{self, Write};
use std::ops::Range;

use arcade_platformer::Phase;
use arcade_platformer::geometry::Rect;
use arcade_platformer::world::WorldView;
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue};
use glam::Vec2;

use crate::theme::{PlatformerTheme, Rgb, dim, term_color};

/// World pixels covered by one terminal cell. Terminal cells are about twice
/// as tall as wide, so a 48px tile is two cells across and one down.
pub const CELL_W: i32 = 24;
pub const CELL_H: i32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

/// A character frame buffer. Drawing is pure; only [`Canvas::flush`] touches
/// the terminal.
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, bg: Rgb) -> Self {
        let blank = Cell {
            ch: ' ',
            fg: bg,
            bg,
        };
        Self {
            cols,
            rows,
            cells: vec![blank; usize::from(cols) * usize::from(rows)],
        }
    }

    /// Canvas that exactly covers a camera view of `view` pixels.
    pub fn for_view(view: Vec2, bg: Rgb) -> Self {
        let cols = (view.x / CELL_W as f32).ceil().max(0.0) as u16;
        let rows = (view.y / CELL_H as f32).ceil().max(0.0) as u16;
        Self::new(cols, rows, bg)
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Reallocate if the size changed. Contents are cleared either way.
    pub fn resize(&mut self, cols: u16, rows: u16, bg: Rgb) {
        if (cols, rows) == (self.cols, self.rows) {
            self.clear(bg);
        } else {
            *self = Self::new(cols, rows, bg);
        }
    }

    pub fn clear(&mut self, bg: Rgb) {
        self.cells.fill(Cell { ch: ' ', fg: bg, bg });
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return None;
        }
        Some(row as usize * usize::from(self.cols) + col as usize)
    }

    pub fn cell(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Set a glyph, keeping the background. Out-of-bounds writes are dropped.
    pub fn put(&mut self, col: i32, row: i32, ch: char, fg: Rgb) {
        if let Some(i) = self.index(col, row) {
            self.cells[i].ch = ch;
            self.cells[i].fg = fg;
        }
    }

    pub fn paint(&mut self, col: i32, row: i32, ch: char, fg: Rgb, bg: Rgb) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell { ch, fg, bg };
        }
    }

    /// Fill a block of cells with one glyph and background.
    pub fn fill(&mut self, cols: Range<i32>, rows: Range<i32>, ch: char, fg: Rgb, bg: Rgb) {
        for row in rows {
            for col in cols.clone() {
                self.paint(col, row, ch, fg, bg);
            }
        }
    }

    /// Fill every cell a screen-space pixel rectangle touches.
    pub fn fill_px(&mut self, rect: &Rect, ch: char, fg: Rgb) {
        let (cols, rows) = cell_span(rect);
        for row in rows {
            for col in cols.clone() {
                self.put(col, row, ch, fg);
            }
        }
    }

    /// Put a glyph at the cell containing a screen-space pixel point.
    pub fn put_px(&mut self, p: Vec2, ch: char, fg: Rgb) {
        let col = (p.x / CELL_W as f32).floor();
        let row = (p.y / CELL_H as f32).floor();
        if col.is_finite() && row.is_finite() {
            self.put(col as i32, row as i32, ch, fg);
        }
    }

    pub fn text(&mut self, col: i32, row: i32, s: &str, fg: Rgb) {
        for (i, ch) in s.chars().enumerate() {
            self.put(col + i as i32, row, ch, fg);
        }
    }

    pub fn text_centered(&mut self, row: i32, s: &str, fg: Rgb) {
        let len = s.chars().count() as i32;
        self.text((i32::from(self.cols) - len) / 2, row, s, fg);
    }

    /// The glyphs of one row, for tests and diagnostics.
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = usize::from(row) * usize::from(self.cols);
        self.cells[start..start + usize::from(self.cols)]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Queue the whole frame and flush it. Color changes are only emitted
    /// when they differ from the previous cell.
    pub fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        let mut fg = None;
        let mut bg = None;
        for row in 0..self.rows {
            queue!(out, cursor::MoveTo(0, row))?;
            let start = usize::from(row) * usize::from(self.cols);
            for cell in &self.cells[start..start + usize::from(self.cols)] {
                if fg != Some(cell.fg) {
                    queue!(out, SetForegroundColor(term_color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    queue!(out, SetBackgroundColor(term_color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

/// Cell columns and rows touched by a pixel rectangle (half-open).
pub fn cell_span(rect: &Rect) -> (Range<i32>, Range<i32>) {
    let cols = rect.left().div_euclid(CELL_W)..(rect.right() + CELL_W - 1).div_euclid(CELL_W);
    let rows = rect.top().div_euclid(CELL_H)..(rect.bottom() + CELL_H - 1).div_euclid(CELL_H);
    (cols, rows)
}

/// Draw one platformer frame: world, player, HUD, then the phase overlay.
pub fn draw_platformer(canvas: &mut Canvas, view: &WorldView<'_>, phase: Phase, theme: &PlatformerTheme) {
    canvas.clear(theme.background);
    let cam = view.camera;

    for r in view.solids {
        canvas.fill_px(&cam.apply(r), '█', theme.solid);
    }
    for p in view.platforms {
        canvas.fill_px(&cam.apply(&p.rect()), '▀', theme.platform);
    }
    for r in view.spikes {
        canvas.fill_px(&cam.apply(r), '▲', theme.spike);
    }
    for r in view.checkpoints {
        canvas.fill_px(&cam.apply(r), '¦', theme.checkpoint);
    }
    for r in view.goals {
        canvas.fill_px(&cam.apply(r), '▓', theme.goal);
    }
    for r in view.coins {
        canvas.put_px(cam.apply(r).center().as_vec2(), 'o', theme.coin);
    }
    for e in view.enemies {
        canvas.fill_px(&cam.apply(&e.rect()), 'M', theme.enemy);
    }
    for p in view.particles {
        let alpha = p.alpha();
        let glyph = if alpha > 0.5 { '*' } else { '·' };
        canvas.put_px(cam.apply_point(p.pos), glyph, dim(p.color, alpha.max(0.3)));
    }
    canvas.fill_px(&cam.apply(&view.player.rect), '█', theme.player);

    canvas.text(1, 0, &format!("Coins: {}", view.score), theme.hud);

    let mid = i32::from(canvas.rows()) / 2;
    match phase {
        Phase::Running => {},
        Phase::Paused => canvas.text_centered(mid, "Paused", theme.hud),
        Phase::Won => {
            canvas.text_centered(mid, "You Win!", theme.hud);
            canvas.text_centered(mid + 1, "Press B/Start to exit", theme.hint);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::game_trait::ArcadeGame;
    use arcade_platformer::RedRunner;
    use arcade_platformer::config::PlatformerConfig;
    use arcade_platformer::level::Level;

    const BG: Rgb = [0, 0, 0];
    const FG: Rgb = [255, 255, 255];

    fn game(rows: &[&str]) -> RedRunner {
        RedRunner::new(Level::parse(rows), &PlatformerConfig::default())
    }

    #[test]
    fn view_canvas_covers_the_camera() {
        let canvas = Canvas::for_view(Vec2::new(960.0, 540.0), BG);
        assert_eq!((canvas.cols(), canvas.rows()), (40, 12));
    }

    #[test]
    fn tiles_span_two_columns_one_row() {
        assert_eq!(cell_span(&Rect::new(48, 48, 48, 48)), (2..4, 1..2));
        assert_eq!(cell_span(&Rect::new(-30, -10, 20, 20)), (-2..0, -1..1));
    }

    #[test]
    fn drawing_is_clipped() {
        let mut canvas = Canvas::new(4, 2, BG);
        canvas.fill_px(&Rect::new(-100, -100, 1000, 1000), '#', FG);
        assert_eq!(canvas.row_text(0), "####");
        assert_eq!(canvas.row_text(1), "####");
        canvas.put(10, 10, 'x', FG);
        canvas.text(2, 1, "long text", FG);
        assert_eq!(canvas.row_text(1), "##lo");
        assert_eq!(canvas.row_text(5), "");
    }

    #[test]
    fn world_and_hud_are_drawn() {
        let game = game(&["....", "@.c.", "XXXX"]);
        let theme = PlatformerTheme::default();
        let mut canvas = Canvas::for_view(game.view().camera.view_size(), theme.background);
        draw_platformer(&mut canvas, &game.view(), game.phase(), &theme);

        assert!(canvas.row_text(0).contains("Coins: 0"));
        assert_eq!(
            canvas.row_text(2),
            format!("{}{}", "█".repeat(8), " ".repeat(32))
        );
        // coin centered in its tile: (2 * 48 + 24) / 24 = column 5
        assert_eq!(canvas.cell(5, 1).map(|c| c.ch), Some('o'));
        assert_eq!(canvas.cell(0, 1).map(|c| c.fg), Some(theme.player));
        assert_eq!(canvas.cell(0, 2).map(|c| c.fg), Some(theme.solid));
    }

    #[test]
    fn overlays_follow_the_phase() {
        let mut game = game(&["@...", "XXXX"]);
        let theme = PlatformerTheme::default();
        let mut canvas = Canvas::for_view(Vec2::new(960.0, 540.0), theme.background);

        game.pause();
        draw_platformer(&mut canvas, &game.view(), game.phase(), &theme);
        assert!(canvas.row_text(6).contains("Paused"));

        game.resume();
        draw_platformer(&mut canvas, &game.view(), game.phase(), &theme);
        assert!(!canvas.row_text(6).contains("Paused"));
    }

    #[test]
    fn won_overlay() {
        let mut game = game(&["@.G", "XXX"]);
        let right = arcade_core::test_helpers::held(&[arcade_core::input::Action::MoveRight]);
        arcade_core::test_helpers::run_frames(&mut game, std::iter::repeat_n(right, 120), 1.0 / 60.0);
        assert!(game.is_complete());

        let theme = PlatformerTheme::default();
        let mut canvas = Canvas::for_view(Vec2::new(960.0, 540.0), theme.background);
        draw_platformer(&mut canvas, &game.view(), game.phase(), &theme);
        assert!(canvas.row_text(6).contains("You Win!"));
        assert!(canvas.row_text(7).contains("Press B/Start to exit"));
    }

    #[test]
    fn flush_emits_glyphs() {
        let mut canvas = Canvas::new(12, 1, BG);
        canvas.text(0, 0, "Coins: 3", FG);
        let mut out = Vec::new();
        canvas.flush(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Coins: 3"));
    }
}
