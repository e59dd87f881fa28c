//! Single-key input. The menu engine only sees the [`KeyInput`] capability;
//! when none is available every prompt reads whole lines instead.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use std::io;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long a raw read waits for a keystroke before falling back to a line read.
pub const RAW_IDLE_LIMIT: Duration = Duration::from_secs(6);

pub trait KeyInput {
    fn enter_raw(&mut self) -> io::Result<()>;

    fn restore(&mut self) -> io::Result<()>;

    /// Next key pressed within `timeout`. Enter is reported as `'\n'`;
    /// `None` means the wait expired.
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<char>>;

    /// Terminal size as `(cols, rows)`, when known.
    fn size(&self) -> Option<(u16, u16)>;
}

/// Raw mode held for the lifetime of the guard.
pub struct RawGuard<'a, K: KeyInput + ?Sized> {
    keys: &'a mut K,
}

impl<'a, K: KeyInput + ?Sized> RawGuard<'a, K> {
    pub fn enter(keys: &'a mut K) -> io::Result<Self> {
        keys.enter_raw()?;
        Ok(Self { keys })
    }

    pub fn read_key(&mut self, timeout: Duration) -> io::Result<Option<char>> {
        self.keys.read_key(timeout)
    }
}

impl<K: KeyInput + ?Sized> Drop for RawGuard<'_, K> {
    fn drop(&mut self) {
        if let Err(e) = self.keys.restore() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// The controlling terminal, driven through crossterm.
pub struct CrosstermKeys;

impl KeyInput for CrosstermKeys {
    fn enter_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }

    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<char>> {
        let deadline = Instant::now() + timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            if !event::poll((deadline - now).min(POLL_INTERVAL))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                // Raw mode swallows SIGINT; treat Ctrl-C as quit.
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Some('q'))
                }
                KeyCode::Char(c) => return Ok(Some(c)),
                KeyCode::Enter => return Ok(Some('\n')),
                KeyCode::Esc => return Ok(Some('q')),
                _ => continue,
            }
        }
    }

    fn size(&self) -> Option<(u16, u16)> {
        terminal::size().ok().filter(|&(cols, rows)| cols > 0 && rows > 0)
    }
}
