//! Dashboard listing and the per-tender detail screen.

use super::console::Console;
use super::form::input_tender;
use super::screen::{
    begin_screen, draw_hero, draw_meta, heading, key_chip, number_chip, paint_trigger, rule, BOLD,
    CYAN, DIM, PINK, RESET, SCREEN_HEIGHT,
};
use super::select::{acknowledge, binary_choice, Pager, SCROLL_DOWN_KEY, SCROLL_UP_KEY};
use super::MenuResult;
use std::io::{BufRead, Write};
use std::path::Path;
use tender_core::agents::AgentSource;
use tender_core::{store, tender, Tender};

const CREATE_KEY: &str = "1";
/// Slot keys `2`..=`7` map onto the visible window of tenders.
const FIRST_SLOT_KEY: usize = 2;
const SLOTS: usize = 6;

/// Drive the dashboard until the user quits. Quitting from any nested prompt
/// surfaces as `Err(MenuError::Cancelled)`.
pub fn run_interactive<R: BufRead, W: Write>(
    root: &Path,
    agents: &dyn AgentSource,
    console: &mut Console<R, W>,
) -> MenuResult<()> {
    let mut offset = 0;
    loop {
        let tenders = store::load_tenders(root)?;
        let mut pager = Pager::at(offset, tenders.len(), SLOTS);
        draw_home(console, &tenders, &pager)?;

        let action = console.menu_choice("")?;
        match action.as_str() {
            CREATE_KEY => create(console, root, agents)?,
            SCROLL_UP_KEY => {
                pager.scroll_up();
            }
            SCROLL_DOWN_KEY => {
                pager.scroll_down();
            }
            key => match slot_for_key(key).and_then(|slot| pager.item(slot)) {
                Some(idx) => detail(console, root, agents, &tenders[idx].name)?,
                None => console.print_err("Invalid selection.")?,
            },
        }
        offset = pager.offset();
    }
}

fn slot_for_key(key: &str) -> Option<usize> {
    let n: usize = key.parse().ok()?;
    (FIRST_SLOT_KEY..FIRST_SLOT_KEY + SLOTS)
        .contains(&n)
        .then(|| n - FIRST_SLOT_KEY)
}

fn create<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    root: &Path,
    agents: &dyn AgentSource,
) -> MenuResult<()> {
    let base = Tender {
        manual: true,
        ..Tender::default()
    };
    let Some(t) = input_tender(console, root, agents, &base, true)? else {
        return Ok(());
    };
    match store::create_tender(root, t) {
        Ok(saved) => console.print_ok(&format!("Saved {}", saved.workflow_file))?,
        Err(e) => {
            console.print_err(&e.to_string())?;
            acknowledge(console)?;
        }
    }
    Ok(())
}

fn draw_home<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    tenders: &[Tender],
    pager: &Pager,
) -> MenuResult<()> {
    begin_screen(console, SCREEN_HEIGHT)?;
    let out = &mut console.out;
    draw_hero(out)?;
    writeln!(out)?;
    draw_meta(out, tenders.len())?;
    writeln!(out)?;

    heading(out, "Select Tender", CYAN)?;
    rule(out, '.')?;
    writeln!(out, "  {}  Create tender", number_chip(1))?;
    for slot in 0..SLOTS {
        match pager.item(slot) {
            Some(idx) => {
                let t = &tenders[idx];
                writeln!(
                    out,
                    "  {}  {:<20} {:<30}",
                    number_chip(FIRST_SLOT_KEY + slot),
                    t.name,
                    paint_trigger(t)
                )?;
            }
            None => writeln!(out)?,
        }
    }
    writeln!(out, "  {}  Scroll up", number_chip(9))?;
    writeln!(out, "  {}  Scroll down", number_chip(0))?;
    writeln!(out, "  {}  Exit", key_chip("q"))?;
    rule(out, '.')?;
    writeln!(out, "{DIM}{}{RESET}", pager.position("tenders"))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// Back / Edit / Delete for one tender. Follows the tender across renames.
fn detail<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    root: &Path,
    agents: &dyn AgentSource,
    name: &str,
) -> MenuResult<()> {
    let mut current = name.to_string();
    loop {
        let tenders = store::load_tenders(root)?;
        let Some(idx) = tender::find_index(&tenders, &current) else {
            console.print_err("Tender no longer exists.")?;
            return Ok(());
        };
        let selected = &tenders[idx];
        draw_detail(console, selected)?;

        match console.menu_choice("")?.as_str() {
            "1" => return Ok(()),
            "2" => {
                let Some(updated) = input_tender(console, root, agents, selected, false)? else {
                    continue;
                };
                match store::update_tender(root, &selected.name, updated) {
                    Ok(saved) => {
                        console.print_ok(&format!("Updated {}", saved.workflow_file))?;
                        current = saved.name;
                    }
                    Err(e) => {
                        console.print_err(&e.to_string())?;
                        acknowledge(console)?;
                    }
                }
            }
            "3" => {
                let question = format!("Delete \"{}\"?", selected.name);
                if !binary_choice(console, &question, false)? {
                    console.print_err("Delete cancelled")?;
                    continue;
                }
                let removed = store::remove_tender(root, &selected.name)?;
                console.print_ok(&format!("Deleted {}", removed.workflow_file))?;
                return Ok(());
            }
            _ => console.print_err("Invalid selection.")?,
        }
    }
}

fn draw_detail<R: BufRead, W: Write>(console: &mut Console<R, W>, t: &Tender) -> MenuResult<()> {
    begin_screen(console, SCREEN_HEIGHT)?;
    let out = &mut console.out;
    draw_hero(out)?;
    writeln!(out)?;
    writeln!(out, "{PINK}{BOLD}Tender{RESET} {BOLD}{}{RESET}", t.name)?;
    writeln!(out, "{DIM}{:<9}{RESET} {}", "Agent:", t.agent)?;
    writeln!(out, "{DIM}{:<9}{RESET} {}", "Trigger:", paint_trigger(t))?;
    writeln!(out, "{DIM}{:<9}{RESET} {} min", "Timeout:", t.timeout())?;
    writeln!(out, "{DIM}{:<9}{RESET} {}", "Workflow:", t.workflow_file)?;
    writeln!(out)?;
    rule(out, '.')?;
    writeln!(out, "  {}  Back", number_chip(1))?;
    writeln!(out, "  {}  Edit", number_chip(2))?;
    writeln!(out, "  {}  Delete", number_chip(3))?;
    for _ in 3..SLOTS {
        writeln!(out)?;
    }
    rule(out, '.')?;
    Ok(())
}
