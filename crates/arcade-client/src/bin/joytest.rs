//! Prints gamepad activity until Esc or Ctrl-C.

use std::io::{self, Write};
use std::time::Duration;

use arcade_client::config::ClientConfig;
use arcade_client::diagnostics::AxisFilter;
use arcade_client::error::ClientError;
use arcade_client::logging;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use gilrs::{EventType, Gilrs};

fn main() {
    if let Err(e) = run() {
        eprintln!("joytest: {e}");
        std::process::exit(1);
    }
}

/// Raw mode lets Esc arrive without Enter; lines need an explicit `\r`.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self, ClientError> {
        terminal::enable_raw_mode().map_err(|e| ClientError::Terminal(e.to_string()))?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn say(line: &str) {
    tracing::info!("{line}");
    let mut out = io::stdout();
    let _ = write!(out, "{line}\r\n");
    let _ = out.flush();
}

fn list_devices(gilrs: &Gilrs) {
    let pads: Vec<_> = gilrs.gamepads().filter(|(_, gp)| gp.is_connected()).collect();
    say(&format!("Detected {} device(s).", pads.len()));
    for (id, gp) in pads {
        say(&format!("[{id}] {} | power: {:?}", gp.name(), gp.power_info()));
    }
}

fn quit_requested() -> Result<bool, ClientError> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c' | 'C'));
            if key.code == KeyCode::Esc || ctrl_c {
                return Ok(true);
            }
            say(&format!("KEY {:?} {:?}", key.code, key.kind));
        }
    }
    Ok(false)
}

fn run() -> Result<(), ClientError> {
    let config = ClientConfig::load();
    config.validate()?;
    logging::init(&config.log_file)?;

    let mut gilrs =
        Gilrs::new().map_err(|e| ClientError::Config(format!("gamepad backend unavailable: {e}")))?;
    let _raw = RawMode::enable()?;
    list_devices(&gilrs);
    say("Press Esc or Ctrl-C to quit.");

    let mut axes = AxisFilter::default();
    loop {
        if quit_requested()? {
            return Ok(());
        }
        while let Some(ev) = gilrs.next_event() {
            let pad = usize::from(ev.id);
            match ev.event {
                EventType::ButtonPressed(button, code) => {
                    say(&format!("joy{pad} BUTTON {button:?} ({code}) DOWN"));
                },
                EventType::ButtonReleased(button, code) => {
                    say(&format!("joy{pad} BUTTON {button:?} ({code}) UP"));
                },
                EventType::AxisChanged(axis, value, _) => {
                    if let Some(v) = axes.report((pad, axis), value) {
                        say(&format!("joy{pad} AXIS {axis:?}: {v:+.2}"));
                    }
                },
                EventType::Connected | EventType::Disconnected => {
                    axes.forget(|&(p, _)| p == pad);
                    say(&format!("Rescanned after joy{pad} {:?}", ev.event));
                    list_devices(&gilrs);
                },
                _ => {},
            }
        }
        std::thread::sleep(Duration::from_millis(8));
    }
}
