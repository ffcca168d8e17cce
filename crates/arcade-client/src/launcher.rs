use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use arcade_core::game_registry::{GameEntry, discover_games};
use arcade_core::input::{Action, ActionState};

use crate::error::ClientError;
use crate::renderer::Canvas;
use crate::theme::{UiTheme, dim};

/// Cards further than this from the scroll position are not drawn.
pub const VISIBLE_RADIUS: f32 = 3.0;
/// Per-second rate at which `scroll` eases toward `index`.
pub const SCROLL_RATE: f32 = 10.0;

/// Carousel selection over `count` entries. `index` wraps; `scroll` trails
/// it smoothly for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    index: usize,
    scroll: f32,
    count: usize,
}

impl Carousel {
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            scroll: 0.0,
            count,
        }
    }

    pub fn next(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    pub fn prev(&mut self) {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
    }

    pub fn update(&mut self, dt: f32) {
        let t = (dt * SCROLL_RATE).min(1.0);
        self.scroll += (self.index as f32 - self.scroll) * t;
    }

    pub fn selected(&self) -> Option<usize> {
        (self.count > 0).then_some(self.index)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Signed distance of entry `i` from the scroll position, wrapped into
    /// `[-count/2, count/2)`.
    pub fn distance(&self, i: usize) -> f32 {
        let n = self.count as f32;
        (i as f32 - self.scroll + n / 2.0).rem_euclid(n) - n / 2.0
    }

    /// Entries close enough to draw, with their distance.
    pub fn visible(&self) -> Vec<(usize, f32)> {
        (0..self.count)
            .map(|i| (i, self.distance(i)))
            .filter(|(_, d)| d.abs() <= VISIBLE_RADIUS)
            .collect()
    }

    /// Adopt a new entry count, keeping the selection in range and snapping
    /// the scroll to it.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.index = if count == 0 { 0 } else { self.index.min(count - 1) };
        self.scroll = self.index as f32;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherCommand {
    Stay,
    Launch(usize),
    Quit,
}

/// Launcher state: the discovered catalog and the carousel over it.
#[derive(Debug, Clone)]
pub struct Launcher {
    games_dir: PathBuf,
    games: Vec<GameEntry>,
    carousel: Carousel,
    elapsed: f32,
}

impl Launcher {
    pub fn new(games_dir: PathBuf) -> Self {
        let games = discover_games(&games_dir);
        Self {
            carousel: Carousel::new(games.len()),
            games_dir,
            games,
            elapsed: 0.0,
        }
    }

    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    pub fn games_dir(&self) -> &Path {
        &self.games_dir
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn selected(&self) -> Option<&GameEntry> {
        self.carousel.selected().and_then(|i| self.games.get(i))
    }

    /// Apply one frame of input. Browsing happens before launch, and launch
    /// wins over back on the same frame.
    pub fn handle(&mut self, input: &ActionState, dt: f32) -> LauncherCommand {
        if !self.games.is_empty() {
            if input.pressed(Action::MoveRight) {
                self.carousel.next();
            }
            if input.pressed(Action::MoveLeft) {
                self.carousel.prev();
            }
        }
        self.carousel.update(dt);
        self.elapsed += dt;

        if let Some(i) = self.carousel.selected()
            && input.pressed(Action::Jump)
        {
            return LauncherCommand::Launch(i);
        }
        if input.pressed(Action::Back) {
            return LauncherCommand::Quit;
        }
        LauncherCommand::Stay
    }

    /// Re-scan the games directory, e.g. after a game exits.
    pub fn rediscover(&mut self) {
        self.games = discover_games(&self.games_dir);
        self.carousel.reset(self.games.len());
    }

    /// 0..1 pulse for the play prompt.
    pub fn pulse(&self) -> f32 {
        0.5 * (1.0 + (self.elapsed * 2.2).sin())
    }
}

/// Program to execute for `entry`, looked up next to the running launcher
/// as well. See [`resolve_program_in`].
pub fn resolve_program(entry: &GameEntry) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok();
    resolve_program_in(entry, exe.as_deref().and_then(Path::parent))
}

/// A relative program resolves to a file in the game directory, then to a
/// sibling executable in `exe_dir` (where cargo puts the arcade binaries),
/// and otherwise is left for the PATH lookup.
pub fn resolve_program_in(entry: &GameEntry, exe_dir: Option<&Path>) -> Option<PathBuf> {
    let name = entry.command.first()?;
    let program = Path::new(name);
    if program.is_absolute() {
        return Some(program.to_path_buf());
    }

    let local = entry.path.join(program);
    if local.is_file() {
        return Some(local);
    }
    if let Some(dir) = exe_dir {
        let sibling = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
        if sibling.is_file() {
            return Some(sibling);
        }
    }
    Some(program.to_path_buf())
}

/// Run the game to completion in the game's directory. Blocks until the
/// child exits.
pub fn launch(entry: &GameEntry) -> Result<ExitStatus, ClientError> {
    let program = resolve_program(entry)
        .ok_or_else(|| ClientError::Launch(format!("{} has no command", entry.id)))?;
    Command::new(&program)
        .args(&entry.command[1..])
        .current_dir(&entry.path)
        .status()
        .map_err(|e| ClientError::Launch(format!("{}: {e}", program.display())))
}

const CARD_COLS: f32 = 26.0;
const CARD_ROWS: f32 = 9.0;

/// Draw the launcher screen: header, cards back to front, then the focused
/// card's title and play prompt.
pub fn draw_launcher(canvas: &mut Canvas, launcher: &Launcher, theme: &UiTheme) {
    canvas.clear(theme.background);
    canvas.text(2, 1, "ARCADE", theme.text_primary);
    canvas.text(
        2,
        2,
        "D-pad/Stick: browse  •  A: play  •  B/Start: back",
        theme.text_secondary,
    );

    let carousel = launcher.carousel();
    let Some(selected) = carousel.selected() else {
        let msg = format!("No games found in {}", launcher.games_dir().display());
        canvas.text_centered(i32::from(canvas.rows()) / 2, &msg, theme.text_secondary);
        return;
    };

    let center_col = i32::from(canvas.cols()) / 2;
    let center_row = i32::from(canvas.rows()) / 2 + 2;
    let spacing = CARD_COLS * 0.72;

    let mut cards = carousel.visible();
    cards.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    for (i, d) in cards {
        let entry = &launcher.games()[i];
        let scale = 0.62 + 0.38 * (1.0 - d.abs() * 0.55).max(0.0);
        let w = (CARD_COLS * scale).round() as i32;
        let h = (CARD_ROWS * scale).round() as i32;
        let x = center_col + (d * spacing).round() as i32 - w / 2;
        let y = center_row + d.abs().round() as i32 - h / 2;

        let focused = i == selected;
        let fade = if focused {
            1.0
        } else if d.abs() < 0.5 {
            0.85
        } else {
            0.65
        };
        let border = dim(entry.accent, fade);
        canvas.fill(x..x + w, y..y + h, ' ', theme.card, theme.card);
        for col in x..x + w {
            canvas.put(col, y, '─', border);
            canvas.put(col, y + h - 1, '─', border);
        }
        for row in y..y + h {
            canvas.put(x, row, '│', border);
            canvas.put(x + w - 1, row, '│', border);
        }

        let title: String = entry.title.chars().take((w - 4).max(0) as usize).collect();
        let text = if focused {
            theme.text_primary
        } else {
            dim(theme.text_secondary, fade)
        };
        canvas.text(x + 2, y + h / 2, &title, text);

        if focused {
            if !entry.subtitle.is_empty() {
                let sub: String = entry.subtitle.chars().take((w - 4).max(0) as usize).collect();
                canvas.text(x + 2, y + h / 2 + 1, &sub, theme.text_secondary);
            }
            let pill = dim(entry.accent, 0.75 + 0.25 * launcher.pulse());
            let prompt = " Press A to Play ";
            let px = x + (w - prompt.chars().count() as i32) / 2;
            let py = y + h + 1;
            for (k, ch) in prompt.chars().enumerate() {
                canvas.paint(px + k as i32, py, ch, theme.text_primary, pill);
            }
        }
    }
}
