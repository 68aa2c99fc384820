//! Raw-mode terminal bridge.
//!
//! Raw mode is entered when a [`TerminalIo`] is created and left when it
//! is dropped, so an early return or a fault still restores the terminal.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::debug;

use super::IoBridge;

/// Interactive console backed by crossterm.
pub struct TerminalIo {
    /// Bytes decoded from key events but not yet read.
    pending: VecDeque<u8>,
    stdout: io::Stdout,
}

impl TerminalIo {
    /// Switch the terminal to raw mode.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        debug!("terminal in raw mode");
        Ok(Self {
            pending: VecDeque::new(),
            stdout: io::stdout(),
        })
    }

    fn queue_event(&mut self, ev: Event) -> io::Result<()> {
        if let Event::Key(key) = ev {
            if let Some(byte) = key_to_byte(key)? {
                self.pending.push_back(byte);
            }
        }
        Ok(())
    }
}

impl Drop for TerminalIo {
    fn drop(&mut self) {
        let _ = self.stdout.flush();
        if let Err(e) = disable_raw_mode() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

impl IoBridge for TerminalIo {
    fn key_available(&mut self) -> io::Result<bool> {
        while self.pending.is_empty() && event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            self.queue_event(ev)?;
        }
        Ok(!self.pending.is_empty())
    }

    fn read_char(&mut self) -> io::Result<u8> {
        loop {
            if let Some(byte) = self.pending.pop_front() {
                return Ok(byte);
            }
            let ev = event::read()?;
            self.queue_event(ev)?;
        }
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        // Raw mode turns off output post-processing.
        if byte == b'\n' {
            self.stdout.write_all(b"\r\n")
        } else {
            self.stdout.write_all(&[byte])
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Translate a key event to the byte a cooked terminal would deliver.
///
/// Ctrl-C is reported as [`io::ErrorKind::Interrupted`] since raw mode
/// suppresses SIGINT.
fn key_to_byte(key: KeyEvent) -> io::Result<Option<u8>> {
    if key.kind == KeyEventKind::Release {
        return Ok(None);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let byte = match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted by user"));
        }
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase() as u8 & 0x1F),
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Esc => Some(0x1B),
        _ => None,
    };
    Ok(byte)
}
