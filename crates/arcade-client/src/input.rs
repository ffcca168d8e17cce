//! Device backends that turn keyboard and gamepad state into held action
//! samples for [`arcade_core::input::ActionTracker`].

use std::time::{Duration, Instant};

use arcade_core::input::{Action, ActionSet, InputSource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};

/// Keyboard binding: arrows/A/D move, Space/W/Up/Z jump, Esc/Q/Backspace back.
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Action::MoveRight),
        KeyCode::Up | KeyCode::Char(' ' | 'w' | 'W' | 'z' | 'Z') => Some(Action::Jump),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q' | 'Q') => Some(Action::Back),
        _ => None,
    }
}

/// Pause requests coming from the terminal rather than from an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseRequest {
    Toggle,
    Pause,
    Resume,
}

/// Key state reconstructed from terminal key events.
///
/// With release events, a key is held from press until release. Without
/// them, a key counts as held for `hold` after its last press or repeat.
#[derive(Debug, Clone)]
pub struct KeyLatch {
    hold: Duration,
    release_events: bool,
    down: ActionSet,
    last_seen: [Option<Instant>; Action::ALL.len()],
}

impl KeyLatch {
    pub fn new(hold: Duration, release_events: bool) -> Self {
        Self {
            hold,
            release_events,
            down: ActionSet::EMPTY,
            last_seen: [None; Action::ALL.len()],
        }
    }

    /// Feed one key event. Returns a pause request for the pause key.
    pub fn key(&mut self, key: KeyEvent, now: Instant) -> Option<PauseRequest> {
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'));
        let action = if ctrl_c {
            Some(Action::Back)
        } else {
            action_for_key(key.code)
        };

        let Some(action) = action else {
            let pause = matches!(key.code, KeyCode::Char('p' | 'P'))
                && key.kind == KeyEventKind::Press;
            return pause.then_some(PauseRequest::Toggle);
        };

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.down.insert(action);
                self.last_seen[action as usize] = Some(now);
            },
            KeyEventKind::Release => {
                self.down.remove(action);
                self.last_seen[action as usize] = None;
            },
        }
        None
    }

    pub fn held(&self, now: Instant) -> ActionSet {
        if self.release_events {
            return self.down;
        }
        Action::ALL
            .into_iter()
            .filter(|&a| {
                self.last_seen[a as usize]
                    .is_some_and(|seen| now.saturating_duration_since(seen) < self.hold)
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.down = ActionSet::EMPTY;
        self.last_seen = [None; Action::ALL.len()];
    }
}

/// Keyboard input read from the crossterm event queue without blocking.
#[derive(Debug)]
pub struct KeyboardInput {
    latch: KeyLatch,
    pause: Option<PauseRequest>,
}

impl KeyboardInput {
    /// `release_events` is true when the terminal reports key releases
    /// (keyboard enhancement enabled).
    pub fn new(hold: Duration, release_events: bool) -> Self {
        if !release_events {
            tracing::debug!(hold_ms = hold.as_millis() as u64, "key releases unsupported, latching keys");
        }
        Self {
            latch: KeyLatch::new(hold, release_events),
            pause: None,
        }
    }

    /// Most recent pause request since the last call.
    pub fn take_pause_request(&mut self) -> Option<PauseRequest> {
        self.pause.take()
    }

    fn drain(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {},
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!("keyboard poll failed: {e}");
                    break;
                },
            }
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(req) = self.latch.key(key, Instant::now()) {
                        self.pause = Some(req);
                    }
                },
                Ok(Event::FocusLost) => self.pause = Some(PauseRequest::Pause),
                Ok(Event::FocusGained) => self.pause = Some(PauseRequest::Resume),
                Ok(_) => {},
                Err(e) => {
                    tracing::warn!("keyboard read failed: {e}");
                    break;
                },
            }
        }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> ActionSet {
        self.drain();
        self.latch.held(Instant::now())
    }
}

/// One gamepad's relevant controls, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadState {
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub stick_x: f32,
    pub south: bool,
    pub east: bool,
    pub start: bool,
}

/// D-pad wins over the stick; the stick only counts beyond `deadzone`.
/// South jumps, East or Start goes back.
pub fn pad_actions(pad: &PadState, deadzone: f32) -> ActionSet {
    let mut direction = i32::from(pad.dpad_right) - i32::from(pad.dpad_left);
    if direction == 0 {
        if pad.stick_x < -deadzone {
            direction = -1;
        } else if pad.stick_x > deadzone {
            direction = 1;
        }
    }

    let mut held = ActionSet::EMPTY;
    if direction < 0 {
        held.insert(Action::MoveLeft);
    }
    if direction > 0 {
        held.insert(Action::MoveRight);
    }
    if pad.south {
        held.insert(Action::Jump);
    }
    if pad.east || pad.start {
        held.insert(Action::Back);
    }
    held
}

/// Gamepad input through gilrs. Without a backend or a connected pad this
/// reports nothing held.
pub struct GamepadInput {
    gilrs: Option<Gilrs>,
    index: usize,
    deadzone: f32,
}

impl GamepadInput {
    pub fn new(index: usize, deadzone: f32) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::warn!("Gamepad support unavailable: {e}");
                None
            },
        };
        let input = Self {
            gilrs,
            index,
            deadzone,
        };
        match input.active() {
            Some((_, name)) => tracing::info!("Using gamepad: {name}"),
            None => tracing::info!("No gamepad detected"),
        }
        input
    }

    /// Id and name of the gamepad at the configured index.
    pub fn active(&self) -> Option<(GamepadId, String)> {
        let gilrs = self.gilrs.as_ref()?;
        gilrs
            .gamepads()
            .filter(|(_, gp)| gp.is_connected())
            .nth(self.index)
            .map(|(id, gp)| (id, gp.name().to_string()))
    }

    fn sample(&self) -> Option<PadState> {
        let (id, _) = self.active()?;
        let gp = self.gilrs.as_ref()?.gamepad(id);
        Some(PadState {
            dpad_left: gp.is_pressed(Button::DPadLeft),
            dpad_right: gp.is_pressed(Button::DPadRight),
            stick_x: gp.value(Axis::LeftStickX),
            south: gp.is_pressed(Button::South),
            east: gp.is_pressed(Button::East),
            start: gp.is_pressed(Button::Start),
        })
    }
}

impl InputSource for GamepadInput {
    fn poll(&mut self) -> ActionSet {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return ActionSet::EMPTY;
        };
        while let Some(ev) = gilrs.next_event() {
            match ev.event {
                EventType::Connected => tracing::info!(id = %ev.id, "gamepad connected"),
                EventType::Disconnected => tracing::info!(id = %ev.id, "gamepad disconnected"),
                EventType::ButtonPressed(button, _) => tracing::debug!("BUTTON {button:?} DOWN"),
                EventType::ButtonReleased(button, _) => tracing::debug!("BUTTON {button:?} UP"),
                _ => {},
            }
        }
        self.sample()
            .map(|pad| pad_actions(&pad, self.deadzone))
            .unwrap_or_default()
    }
}

/// Union of two sources: an action is held if either source holds it.
pub struct Combined<A, B>(pub A, pub B);

impl<A: InputSource, B: InputSource> InputSource for Combined<A, B> {
    fn poll(&mut self) -> ActionSet {
        self.0.poll().union(self.1.poll())
    }
}
