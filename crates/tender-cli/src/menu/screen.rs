//! Dashboard decoration: colours, chips, rules, and screen centering.

use super::console::Console;
use std::io::{self, BufRead, Write};
use tender_core::{schedule, Tender};

pub const RESET: &str = "\x1b[0m";
pub const DIM: &str = "\x1b[2m";
pub const BOLD: &str = "\x1b[1m";
pub const WHITE: &str = "\x1b[97m";
pub const BLUE: &str = "\x1b[38;5;45m";
pub const CYAN: &str = "\x1b[38;5;51m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[38;5;226m";
pub const RED: &str = "\x1b[31m";
pub const MAGENTA: &str = "\x1b[38;5;213m";
pub const PINK: &str = "\x1b[38;5;205m";
pub const BG_BLUE: &str = "\x1b[48;5;17m";
pub const BG_MAGENTA: &str = "\x1b[48;5;54m";
pub const BG_BLACK: &str = "\x1b[48;5;16m";
pub const BG_PINK: &str = "\x1b[48;5;89m";

/// Width of the centered panel.
pub const PANEL_WIDTH: usize = 86;

/// Height of a full dashboard screen, used for vertical centering.
pub const SCREEN_HEIGHT: usize = 27;

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

pub fn number_chip(n: usize) -> String {
    const BGS: [&str; 5] = [BG_BLUE, BG_MAGENTA, BG_PINK, BG_BLUE, BG_MAGENTA];
    let slot = if n == 0 { BGS.len() } else { n };
    let bg = BGS[(slot - 1) % BGS.len()];
    format!("{bg}{WHITE}{BOLD} {n} {RESET}")
}

pub fn key_chip(key: &str) -> String {
    format!("{BG_BLACK}{WHITE}{BOLD} {key} {RESET}")
}

pub fn heading(w: &mut impl Write, title: &str, color: &str) -> io::Result<()> {
    writeln!(w, "{color}{BOLD}{title}{RESET}")
}

pub fn rule(w: &mut impl Write, ch: char) -> io::Result<()> {
    writeln!(w, "{}", ch.to_string().repeat(PANEL_WIDTH))
}

fn band(w: &mut impl Write, bg: &str, text: &str) -> io::Result<()> {
    writeln!(w, "{bg}{WHITE}{BOLD}{text:^80}{RESET}")
}

pub fn draw_hero(w: &mut impl Write) -> io::Result<()> {
    rule(w, '=')?;
    band(w, BG_BLACK, "")?;
    band(w, BG_BLUE, "TENDER")?;
    band(w, BG_MAGENTA, "")?;
    band(w, BG_PINK, "Autonomous OpenCode runs in GitHub Actions")?;
    band(w, BG_BLUE, "")?;
    band(w, BG_BLACK, "")?;
    rule(w, '=')
}

pub fn draw_meta(w: &mut impl Write, count: usize) -> io::Result<()> {
    writeln!(
        w,
        "{BG_MAGENTA}{WHITE}{BOLD} STATE {RESET} GitHub Actions workflows (.github/workflows)"
    )?;
    writeln!(w, "{BG_BLUE}{WHITE}{BOLD} MODE  {RESET} Autonomous commits to main")?;
    writeln!(w, "{BG_PINK}{WHITE}{BOLD} COUNT {RESET} {count} total tender(s)")
}

/// Trigger summary coloured by its dominant trigger.
pub fn paint_trigger(t: &Tender) -> String {
    let summary = schedule::summarize(&t.cron, t.manual, t.push);
    let color = match (t.has_schedule(), t.push, t.manual) {
        (true, _, true) => CYAN,
        (true, true, false) => PINK,
        (true, false, false) => MAGENTA,
        (false, true, _) => BLUE,
        (false, false, true) => GREEN,
        (false, false, false) => return summary,
    };
    format!("{color}{summary}{RESET}")
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// Clear the terminal and indent subsequent output so a `content_height`
/// tall panel lands in the middle. Without a known terminal size only the
/// clear is emitted.
pub fn begin_screen<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    content_height: usize,
) -> io::Result<()> {
    let size = console.size();
    console.out.set_prefix("");
    let raw = console.out.raw();
    write!(raw, "\x1b[H\x1b[2J")?;

    let Some((cols, rows)) = size else {
        return Ok(());
    };
    let (cols, rows) = (usize::from(cols), usize::from(rows));
    let fill = format!("{BG_BLACK}{}{RESET}\n", " ".repeat(cols));
    for _ in 0..rows {
        raw.write_all(fill.as_bytes())?;
    }
    write!(raw, "\x1b[H")?;
    for _ in 0..rows.saturating_sub(content_height) / 2 {
        writeln!(raw)?;
    }

    let left = cols.saturating_sub(PANEL_WIDTH) / 2;
    console.out.set_prefix(" ".repeat(left));
    Ok(())
}
