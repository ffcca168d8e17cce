use std::time::Duration;

use arcade_core::game_trait::{ArcadeGame, GameEvent};
use arcade_core::input::{Action, ActionState, ActionTracker, InputSource};
use arcade_core::time::FrameClock;
use arcade_platformer::RedRunner;
use arcade_platformer::config::PlatformerConfig;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::input::{Combined, GamepadInput, KeyboardInput, PauseRequest};
use crate::launcher::{Launcher, LauncherCommand, draw_launcher, launch};
use crate::renderer::{Canvas, draw_platformer};
use crate::terminal::TerminalSession;
use crate::theme::Theme;

pub type Controls = Combined<KeyboardInput, GamepadInput>;

/// Keyboard plus the configured gamepad, for the current terminal session.
pub fn controls(config: &ClientConfig, session: &TerminalSession) -> Controls {
    Combined(
        KeyboardInput::new(
            Duration::from_secs_f32(config.input.key_hold_secs),
            session.release_events(),
        ),
        GamepadInput::new(config.input.gamepad_index, config.input.deadzone),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One frame of a game session: back quits immediately, pause requests are
/// applied, then the game advances (a paused game ignores the update).
pub fn game_frame(
    game: &mut dyn ArcadeGame,
    input: &ActionState,
    pause: Option<PauseRequest>,
    dt: f32,
) -> Flow {
    if input.pressed(Action::Back) {
        tracing::info!("Back/Exit pressed");
        return Flow::Quit;
    }

    match pause {
        Some(PauseRequest::Toggle) if game.is_paused() => game.resume(),
        Some(PauseRequest::Toggle | PauseRequest::Pause) => game.pause(),
        Some(PauseRequest::Resume) => game.resume(),
        None => {},
    }

    for event in game.update(dt, input) {
        match event {
            GameEvent::ScoreUpdate { score } => tracing::debug!(score, "score"),
            GameEvent::PlayerDied => tracing::debug!("player died"),
            GameEvent::CheckpointReached => tracing::debug!("checkpoint"),
            GameEvent::LevelComplete => tracing::info!(score = game.score(), "You Win!"),
        }
    }
    Flow::Continue
}

/// Play Red Runner in the terminal until back is pressed.
pub fn run_red_runner(config: &ClientConfig, game_config: &PlatformerConfig) -> Result<(), ClientError> {
    let mut game = RedRunner::from_config(game_config)
        .map_err(|e| ClientError::Config(format!("level: {e}")))?;
    tracing::info!(name = %game.metadata().name, "starting game");

    let theme = Theme::load();
    let mut session = TerminalSession::enter()?;
    let mut input = controls(config, &session);
    let mut tracker = ActionTracker::new();
    let mut clock = FrameClock::new(config.fps, config.max_dt);
    let mut canvas = Canvas::for_view(game.view().camera.view_size(), theme.platformer.background);

    loop {
        let dt = clock.tick();
        let state = tracker.advance(input.poll());
        let pause = input.0.take_pause_request();
        if game_frame(&mut game, &state, pause, dt) == Flow::Quit {
            break;
        }
        draw_platformer(&mut canvas, &game.view(), game.phase(), &theme.platformer);
        canvas.flush(session.out())?;
    }
    Ok(())
}

/// Browse and launch games until back is pressed. The launcher is fully
/// suspended while a game runs.
pub fn run_launcher(config: &ClientConfig) -> Result<(), ClientError> {
    let theme = Theme::load();
    let mut launcher = Launcher::new(config.launcher.games_dir.clone());
    let mut session = TerminalSession::enter()?;
    let mut input = controls(config, &session);
    let mut tracker = ActionTracker::new();
    let mut clock = FrameClock::new(config.fps, config.max_dt);
    let (cols, rows) = session.size();
    let mut canvas = Canvas::new(cols, rows, theme.ui.background);

    loop {
        let dt = clock.tick();
        let state = tracker.advance(input.poll());

        match launcher.handle(&state, dt) {
            LauncherCommand::Stay => {},
            LauncherCommand::Quit => {
                tracing::info!("Back/Exit pressed");
                break;
            },
            LauncherCommand::Launch(i) => {
                let entry = launcher.games()[i].clone();
                tracing::info!(game = %entry.id, "Launching");
                session.suspend()?;
                match launch(&entry) {
                    Ok(status) => tracing::info!(game = %entry.id, %status, "game exited"),
                    Err(e) => tracing::warn!("Game error: {e}"),
                }
                session.resume()?;

                launcher.rediscover();
                input = controls(config, &session);
                tracker.reset();
                clock.reset();
                continue;
            },
        }

        let (cols, rows) = session.size();
        canvas.resize(cols, rows, theme.ui.background);
        draw_launcher(&mut canvas, &launcher, &theme.ui);
        canvas.flush(session.out())?;
    }
    Ok(())
}
