use std::io::{self, Stdout};

use crossterm::event::{
    DisableFocusChange, EnableFocusChange, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};

use crate::error::ClientError;

fn terminal_err(e: io::Error) -> ClientError {
    ClientError::Terminal(e.to_string())
}

/// Raw-mode alternate-screen session. Restores the terminal on drop.
///
/// `suspend`/`resume` hand the terminal to a child process and take it back.
pub struct TerminalSession {
    out: Stdout,
    enhanced: bool,
    active: bool,
}

impl TerminalSession {
    pub fn enter() -> Result<Self, ClientError> {
        let mut session = Self {
            out: io::stdout(),
            enhanced: false,
            active: false,
        };
        session.resume()?;
        Ok(session)
    }

    pub fn resume(&mut self) -> Result<(), ClientError> {
        if self.active {
            return Ok(());
        }
        terminal::enable_raw_mode().map_err(terminal_err)?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableFocusChange,
            terminal::Clear(terminal::ClearType::All),
        )
        .map_err(terminal_err)?;

        self.enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if self.enhanced {
            execute!(
                self.out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .map_err(terminal_err)?;
        }
        self.active = true;
        tracing::debug!(key_releases = self.enhanced, "terminal session active");
        Ok(())
    }

    pub fn suspend(&mut self) -> Result<(), ClientError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags).map_err(terminal_err)?;
        }
        execute!(
            self.out,
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
        .map_err(terminal_err)?;
        terminal::disable_raw_mode().map_err(terminal_err)
    }

    /// Whether the terminal reports key release events.
    pub fn release_events(&self) -> bool {
        self.enhanced
    }

    /// Current terminal size in cells, or 80x24 if it cannot be queried.
    pub fn size(&self) -> (u16, u16) {
        terminal::size().unwrap_or((80, 24))
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.suspend();
    }
}
