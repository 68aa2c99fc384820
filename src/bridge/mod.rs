//! Console I/O used by the VM.
//!
//! The VM never touches the terminal itself. Keyboard polling for the
//! memory-mapped KBSR/KBDR registers and the console traps all go through
//! an [`IoBridge`] supplied by the host:
//! - [`PipeIo`]: in-memory queues, for tests and embedding
//! - [`StdIo`]: plain stdin/stdout, input read on a background thread
//! - `TerminalIo`: raw-mode terminal (feature `terminal`)

#[cfg(feature = "terminal")]
pub mod terminal;

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use log::debug;

#[cfg(feature = "terminal")]
pub use terminal::TerminalIo;

/// Host-provided console primitives.
pub trait IoBridge {
    /// Non-blocking check for pending input.
    fn key_available(&mut self) -> io::Result<bool>;

    /// Blocking read of one character, without echo.
    fn read_char(&mut self) -> io::Result<u8>;

    /// Write one character to the output stream.
    fn write_char(&mut self, byte: u8) -> io::Result<()>;

    /// Make everything written so far visible.
    fn flush(&mut self) -> io::Result<()>;

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for byte in s.bytes() {
            self.write_char(byte)?;
        }
        Ok(())
    }
}

impl<B: IoBridge + ?Sized> IoBridge for &mut B {
    fn key_available(&mut self) -> io::Result<bool> {
        (**self).key_available()
    }

    fn read_char(&mut self) -> io::Result<u8> {
        (**self).read_char()
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_char(byte)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Scripted input and captured output.
///
/// Reading past the end of the scripted input fails with
/// [`io::ErrorKind::UnexpectedEof`].
#[derive(Debug, Default, Clone)]
pub struct PipeIo {
    input: VecDeque<u8>,
    output: Vec<u8>,
    flushed: usize,
}

impl PipeIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bridge with `input` already queued.
    pub fn with_input(input: &[u8]) -> Self {
        let mut pipe = Self::new();
        pipe.push_input(input);
        pipe
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Everything written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output as text (lossy).
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Number of output bytes covered by the last flush.
    pub fn flushed_len(&self) -> usize {
        self.flushed
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

impl IoBridge for PipeIo {
    fn key_available(&mut self) -> io::Result<bool> {
        Ok(!self.input.is_empty())
    }

    fn read_char(&mut self) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input exhausted"))
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushed = self.output.len();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Bytes handed over by the reader thread.
#[derive(Debug, Default)]
struct Inbox {
    bytes: VecDeque<u8>,
    /// Set once the source is exhausted or failed.
    closed: Option<io::ErrorKind>,
}

type SharedInbox = Arc<(Mutex<Inbox>, Condvar)>;

/// Process stdin/stdout in their default (line-buffered) mode.
///
/// Input is drained by a background thread into a shared queue, so
/// `key_available` never waits on the source; `read_char` blocks on the
/// queue instead.
pub struct StdIo<W: Write = io::Stdout> {
    inbox: SharedInbox,
    output: W,
}

impl StdIo {
    pub fn new() -> Self {
        Self::with_streams(io::stdin(), io::stdout())
    }
}

impl Default for StdIo {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdIo<W> {
    /// Bridge reading from `input` on a background thread and writing to
    /// `output`.
    pub fn with_streams<R: Read + Send + 'static>(input: R, output: W) -> Self {
        let inbox = SharedInbox::default();
        let feed = Arc::clone(&inbox);
        thread::spawn(move || pump(input, &feed));
        Self { inbox, output }
    }

    fn lock(&self) -> MutexGuard<'_, Inbox> {
        self.inbox.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Copy `input` into `inbox` until end of stream or error.
fn pump<R: Read>(mut input: R, inbox: &SharedInbox) {
    let (lock, ready) = &**inbox;
    let mut buf = [0u8; 256];
    loop {
        let result = input.read(&mut buf);
        let mut inbox = lock.lock().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(0) => inbox.closed = Some(io::ErrorKind::UnexpectedEof),
            Ok(n) => inbox.bytes.extend(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("input reader stopped: {}", e);
                inbox.closed = Some(e.kind());
            }
        }
        let done = inbox.closed.is_some();
        drop(inbox);
        ready.notify_all();
        if done {
            return;
        }
    }
}

impl<W: Write> IoBridge for StdIo<W> {
    fn key_available(&mut self) -> io::Result<bool> {
        Ok(!self.lock().bytes.is_empty())
    }

    fn read_char(&mut self) -> io::Result<u8> {
        let ready = &self.inbox.1;
        let mut inbox = self.lock();
        loop {
            if let Some(byte) = inbox.bytes.pop_front() {
                return Ok(byte);
            }
            if let Some(kind) = inbox.closed {
                return Err(io::Error::new(kind, "end of input"));
            }
            inbox = ready.wait(inbox).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.output.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
