//! Prompt primitives shared by every screen.

use super::screen::{DIM, GREEN, RED, RESET, YELLOW};
use super::terminal::{KeyInput, RawGuard, RAW_IDLE_LIMIT};
use super::{MenuError, MenuResult};
use std::io::{self, BufRead, Write};

/// The reserved quit token, matched case-insensitively.
pub const QUIT_KEY: &str = "q";

pub fn is_quit(choice: &str) -> bool {
    choice.trim().eq_ignore_ascii_case(QUIT_KEY)
}

// ---------------------------------------------------------------------------
// Indented
// ---------------------------------------------------------------------------

/// Writer that prefixes every line with a fixed indent. Used to center the
/// dashboard panel horizontally.
pub struct Indented<W> {
    inner: W,
    prefix: String,
    at_line_start: bool,
}

impl<W: Write> Indented<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            prefix: String::new(),
            at_line_start: true,
        }
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
        self.at_line_start = true;
    }

    /// The undecorated writer, for cursor control sequences.
    pub fn raw(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Indented<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.prefix.is_empty() {
            return self.inner.write(buf);
        }
        let mut rest = buf;
        while !rest.is_empty() {
            if self.at_line_start {
                self.inner.write_all(self.prefix.as_bytes())?;
                self.at_line_start = false;
            }
            match rest.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    self.inner.write_all(&rest[..=i])?;
                    self.at_line_start = true;
                    rest = &rest[i + 1..];
                }
                None => {
                    self.inner.write_all(rest)?;
                    break;
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Line input, decorated output, and optional single-key input.
pub struct Console<R, W> {
    input: R,
    pub out: Indented<W>,
    keys: Option<Box<dyn KeyInput>>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W, keys: Option<Box<dyn KeyInput>>) -> Self {
        Self {
            input,
            out: Indented::new(out),
            keys,
        }
    }

    /// Terminal size as `(cols, rows)`; unknown without a key capability.
    pub fn size(&self) -> Option<(u16, u16)> {
        self.keys.as_ref().and_then(|k| k.size())
    }

    /// Whether earlier output can be erased in place.
    pub fn can_repaint(&self) -> bool {
        self.keys.is_some()
    }

    /// Move the cursor up `lines` rows and clear to the end of the screen.
    pub fn erase_lines(&mut self, lines: usize) -> io::Result<()> {
        write!(self.out.raw(), "\x1b[{lines}A\x1b[J")
    }

    /// Free-text prompt. The quit token is ordinary data here.
    pub fn prompt_text(&mut self, label: &str) -> MenuResult<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        Ok(self.read_line()?)
    }

    /// Line prompt where the quit token cancels.
    pub fn prompt_line(&mut self, label: &str) -> MenuResult<String> {
        let choice = self.prompt_text(label)?;
        if is_quit(&choice) {
            return Err(MenuError::Cancelled);
        }
        Ok(choice)
    }

    /// Menu prompt. Reads a single key when the terminal allows it, else a
    /// line. Enter yields an empty choice; the quit token cancels.
    pub fn menu_choice(&mut self, label: &str) -> MenuResult<String> {
        if self.keys.is_none() {
            return self.prompt_line(label);
        }
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let key = match self.keys.as_deref_mut().map(RawGuard::enter) {
            Some(Ok(mut guard)) => guard.read_key(RAW_IDLE_LIMIT)?,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "raw mode unavailable; reading a line");
                None
            }
            None => None,
        };
        let Some(key) = key else {
            return self.finish_choice(None);
        };

        if key == '\n' || key == '\r' {
            writeln!(self.out)?;
            return Ok(String::new());
        }
        let choice = key.to_string().trim().to_string();
        writeln!(self.out, "{choice}")?;
        self.finish_choice(Some(choice))
    }

    fn finish_choice(&mut self, choice: Option<String>) -> MenuResult<String> {
        let choice = match choice {
            Some(c) => c,
            None => self.read_line()?,
        };
        if is_quit(&choice) {
            return Err(MenuError::Cancelled);
        }
        Ok(choice)
    }

    /// One trimmed line; end of input reads as empty.
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    // -----------------------------------------------------------------------
    // Status lines
    // -----------------------------------------------------------------------

    pub fn print_err(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "  {RED}ERROR:{RESET} {msg}")
    }

    pub fn print_info(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "  {DIM}INFO:{RESET} {msg}")
    }

    pub fn print_ok(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "  {GREEN}OK:{RESET} {msg}")
    }

    pub fn print_note(&mut self, msg: &str) -> io::Result<()> {
        writeln!(self.out, "{YELLOW}Note:{RESET} {msg}")
    }
}
