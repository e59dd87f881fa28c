//! Numbered-option selection, paged when the list outgrows single-digit keys.

use super::console::Console;
use super::screen::{heading, number_chip, rule, CYAN, DIM, RESET};
use super::MenuResult;
use std::io::{BufRead, Write};
use std::ops::Range;

/// Lists longer than this switch to paged mode.
pub const MAX_DIRECT_OPTIONS: usize = 9;
pub const PAGE_SIZE: usize = 8;
pub const SCROLL_UP_KEY: &str = "9";
pub const SCROLL_DOWN_KEY: &str = "0";

/// Lines drawn per page: blank, title, rule, slots, two scroll rows, rule,
/// position, status.
const PAGE_RENDER_LINES: usize = PAGE_SIZE + 8;

// ---------------------------------------------------------------------------
// Pager
// ---------------------------------------------------------------------------

/// A fixed-size window over `total` items, stepped one page at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    offset: usize,
    total: usize,
    page_size: usize,
}

impl Pager {
    /// Window starting at `offset`, snapped back onto the last page if past it.
    pub fn at(offset: usize, total: usize, page_size: usize) -> Self {
        Self {
            offset: clamp_offset(offset, total, page_size),
            total,
            page_size,
        }
    }

    /// Window containing item `index`.
    pub fn containing(index: usize, total: usize, page_size: usize) -> Self {
        Self::at((index / page_size) * page_size, total, page_size)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible(&self) -> Range<usize> {
        self.offset..(self.offset + self.page_size).min(self.total)
    }

    /// Item under zero-based `slot`, if the slot is filled.
    pub fn item(&self, slot: usize) -> Option<usize> {
        let idx = self.offset + slot;
        (slot < self.page_size && idx < self.total).then_some(idx)
    }

    /// Previous page. Returns false, leaving the window alone, on the first page.
    pub fn scroll_up(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.page_size);
        true
    }

    /// Next page. Returns false, leaving the window alone, on the last page.
    pub fn scroll_down(&mut self) -> bool {
        let next = self.offset + self.page_size;
        if next >= self.total {
            return false;
        }
        self.offset = next;
        true
    }

    pub fn page(&self) -> usize {
        self.offset / self.page_size + 1
    }

    pub fn pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Footer text, e.g. `Showing 9-10 of 10 (page 2/2)`.
    pub fn position(&self, noun: &str) -> String {
        if self.total == 0 {
            return format!("Showing 0 {noun}");
        }
        let range = self.visible();
        format!(
            "Showing {}-{} of {} (page {}/{})",
            range.start + 1,
            range.end,
            self.total,
            self.page(),
            self.pages()
        )
    }
}

pub fn clamp_offset(offset: usize, total: usize, page_size: usize) -> usize {
    if total == 0 {
        return 0;
    }
    offset.min(((total - 1) / page_size) * page_size)
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Ask the user to pick one of `options`, returning its index. With a
/// `default`, blank input selects it.
pub fn select_numbered<R, W, S>(
    console: &mut Console<R, W>,
    title: &str,
    options: &[S],
    default: Option<usize>,
) -> MenuResult<usize>
where
    R: BufRead,
    W: Write,
    S: AsRef<str>,
{
    let default = default.map(|d| if d < options.len() { d } else { 0 });
    if options.len() <= MAX_DIRECT_OPTIONS {
        select_direct(console, title, options, default)
    } else {
        select_paged(console, title, options, default)
    }
}

fn option_line(option: &str, is_default: bool) -> String {
    if is_default {
        format!("{option} {DIM}(default){RESET}")
    } else {
        option.to_string()
    }
}

fn select_direct<R: BufRead, W: Write, S: AsRef<str>>(
    console: &mut Console<R, W>,
    title: &str,
    options: &[S],
    default: Option<usize>,
) -> MenuResult<usize> {
    let out = &mut console.out;
    writeln!(out)?;
    heading(out, title, CYAN)?;
    rule(out, '.')?;
    for (i, option) in options.iter().enumerate() {
        let line = option_line(option.as_ref(), default == Some(i));
        writeln!(out, "  {}  {line}", number_chip(i + 1))?;
    }
    rule(out, '.')?;

    let n = options.len();
    let label = match default {
        Some(d) => format!("Choose 1-{n} (default: {}): ", d + 1),
        None => format!("Choose 1-{n}: "),
    };
    loop {
        let choice = console.menu_choice(&label)?;
        if choice.is_empty() {
            match default {
                Some(d) => return Ok(d),
                None => {
                    console.print_err("Selection required.")?;
                    continue;
                }
            }
        }
        match choice.parse::<usize>() {
            Ok(k) if (1..=n).contains(&k) => return Ok(k - 1),
            _ => console.print_err("Invalid selection.")?,
        }
    }
}

fn select_paged<R: BufRead, W: Write, S: AsRef<str>>(
    console: &mut Console<R, W>,
    title: &str,
    options: &[S],
    default: Option<usize>,
) -> MenuResult<usize> {
    let mut pager = Pager::containing(default.unwrap_or(0), options.len(), PAGE_SIZE);
    let label = if default.is_some() {
        "Choose 1-8, 9(up), 0(down) (Enter for default): "
    } else {
        "Choose 1-8, 9(up), 0(down): "
    };

    let mut status = "";
    let mut redraw = false;
    loop {
        if redraw && console.can_repaint() {
            console.erase_lines(PAGE_RENDER_LINES + 1)?;
        }
        draw_page(console, title, options, default, &pager, status)?;
        redraw = true;
        status = "";

        let choice = console.menu_choice(label)?;
        match choice.as_str() {
            "" => match default {
                Some(d) => return Ok(d),
                None => status = "Selection required.",
            },
            SCROLL_UP_KEY => {
                if !pager.scroll_up() {
                    status = "Already at first page.";
                }
            }
            SCROLL_DOWN_KEY => {
                if !pager.scroll_down() {
                    status = "Already at last page.";
                }
            }
            key => {
                let slot = key
                    .parse::<usize>()
                    .ok()
                    .filter(|k| (1..=PAGE_SIZE).contains(k))
                    .and_then(|k| pager.item(k - 1));
                match slot {
                    Some(idx) => return Ok(idx),
                    None => status = "Invalid selection.",
                }
            }
        }
    }
}

fn draw_page<R: BufRead, W: Write, S: AsRef<str>>(
    console: &mut Console<R, W>,
    title: &str,
    options: &[S],
    default: Option<usize>,
    pager: &Pager,
    status: &str,
) -> MenuResult<()> {
    let out = &mut console.out;
    writeln!(out)?;
    heading(out, title, CYAN)?;
    rule(out, '.')?;
    for slot in 0..PAGE_SIZE {
        match pager.item(slot) {
            Some(idx) => {
                let line = option_line(options[idx].as_ref(), default == Some(idx));
                writeln!(out, "  {}  {line}", number_chip(slot + 1))?;
            }
            None => writeln!(out)?,
        }
    }
    writeln!(out, "  {}  Scroll up", number_chip(9))?;
    writeln!(out, "  {}  Scroll down", number_chip(0))?;
    rule(out, '.')?;
    writeln!(out, "{DIM}{}{RESET}", pager.position("options"))?;
    if status.is_empty() {
        writeln!(console.out)?;
    } else {
        console.print_info(status)?;
    }
    Ok(())
}

/// Yes/No question; blank input takes `default`.
pub fn binary_choice<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    question: &str,
    default: bool,
) -> MenuResult<bool> {
    let idx = select_numbered(console, question, &["Yes", "No"], Some(usize::from(!default)))?;
    Ok(idx == 0)
}

/// Pause until the user acknowledges the last message.
pub fn acknowledge<R: BufRead, W: Write>(console: &mut Console<R, W>) -> MenuResult<()> {
    select_numbered(console, "Continue", &["Back to dashboard"], None)?;
    Ok(())
}
