//! Crossterm-backed console adapter.
//!
//! Raw mode + alternate screen are entered on construction and restored on
//! [`Drop`], so an early error return or panic unwind still leaves the
//! operator with a usable terminal. Errors from the transport are swallowed
//! best-effort: the engine's contract treats the console as non-failing.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::platform::console::{Console, Key};

/// Real-terminal console. One instance should exist at a time.
pub struct TermConsole {
    stdout: io::Stdout,
}

impl TermConsole {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn map_key(code: KeyCode) -> Key {
        match code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Escape,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

impl Drop for TermConsole {
    fn drop(&mut self) {
        // Always restore terminal state.
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Console for TermConsole {
    fn size(&self) -> (u16, u16) {
        terminal::size().unwrap_or((80, 25))
    }

    fn set_cursor(&mut self, col: u16, row: u16) {
        let _ = queue!(self.stdout, MoveTo(col, row));
    }

    fn write(&mut self, text: &str) {
        let _ = write!(self.stdout, "{text}");
    }

    fn clear(&mut self) {
        let _ = queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All));
    }

    fn hide_cursor(&mut self) {
        let _ = queue!(self.stdout, Hide);
    }

    fn beep(&mut self) {
        // BEL — terminal bell.
        let _ = self.stdout.write_all(b"\x07");
        let _ = self.stdout.flush();
    }

    fn key_available(&mut self) -> bool {
        event::poll(Duration::ZERO).unwrap_or(false)
    }

    fn read_key(&mut self) -> Key {
        // Skip non-key events (resize, mouse) until a key arrives.
        loop {
            match event::read() {
                Ok(Event::Key(key)) => return Self::map_key(key.code),
                Ok(_) => {}
                Err(_) => return Key::Other,
            }
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}
