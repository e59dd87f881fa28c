//! The create/edit form. Every step writes into a draft; the draft is only
//! returned once it validates, so an aborted form commits nothing.

use super::console::Console;
use super::screen::{begin_screen, draw_hero, draw_meta, heading, rule, CYAN, SCREEN_HEIGHT};
use super::select::{acknowledge, binary_choice, select_numbered};
use super::MenuResult;
use std::io::{BufRead, Write};
use std::path::Path;
use tender_core::agents::AgentSource;
use tender_core::schedule::{self, ScheduleMode, QUARTER_MINUTES, TIME_PRESETS, WEEKDAY_PRESETS};
use tender_core::tender::normalize_timeout_minutes;
use tender_core::{store, Tender};

const UNSUPPORTED_SCHEDULE: &str = "Existing schedule is unsupported in presets; choose a new one.";

struct Form<'a, R, W> {
    console: &'a mut Console<R, W>,
    root: &'a Path,
    agents: &'a dyn AgentSource,
    base: &'a Tender,
    is_new: bool,
    draft: Tender,
}

/// Walk the user through every field, starting from `base`.
///
/// Returns `Ok(None)` when the draft was discarded after a visible error, and
/// `Err(MenuError::Cancelled)` when the user quit.
pub fn input_tender<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    root: &Path,
    agents: &dyn AgentSource,
    base: &Tender,
    is_new: bool,
) -> MenuResult<Option<Tender>> {
    let mut draft = base.clone();
    if is_new {
        draft.agent.clear();
    }
    Form {
        console,
        root,
        agents,
        base,
        is_new,
        draft,
    }
    .run()
}

impl<R: BufRead, W: Write> Form<'_, R, W> {
    fn run(mut self) -> MenuResult<Option<Tender>> {
        let Some(name) = self.ask_name()? else {
            return Ok(None);
        };
        self.draft.name = name;

        let Some(agent) = self.ask_agent()? else {
            return Ok(None);
        };
        self.draft.agent = agent;

        self.draw("", true)?;
        self.draft.push = binary_choice(self.console, "Run on every push to main?", self.base.push)?;

        self.draw("", true)?;
        self.draft.timeout_minutes = self.ask_timeout()?;

        let Some(cron) = self.ask_schedule()? else {
            return Ok(None);
        };

        let result = Tender {
            name: self.draft.name.clone(),
            agent: self.draft.agent.trim().to_string(),
            prompt: self.base.prompt.clone(),
            cron,
            manual: true,
            push: self.draft.push,
            timeout_minutes: self.draft.timeout_minutes,
            workflow_file: self.base.workflow_file.clone(),
        };
        if let Err(e) = result.validate() {
            self.fail(&e.to_string())?;
            return Ok(None);
        }
        Ok(Some(result))
    }

    fn ask_name(&mut self) -> MenuResult<Option<String>> {
        self.draw("", false)?;
        let base_name = self.base.name.trim();
        let label = if base_name.is_empty() {
            "Name: ".to_string()
        } else {
            format!("Name (default: {base_name}): ")
        };
        let input = self.console.prompt_text(&label)?;
        if !input.is_empty() {
            return Ok(Some(input));
        }
        if base_name.is_empty() {
            self.fail_without_agent("Name is required.")?;
            return Ok(None);
        }
        Ok(Some(base_name.to_string()))
    }

    fn ask_agent(&mut self) -> MenuResult<Option<String>> {
        let agents = match self.agents.discover() {
            Ok(agents) => agents,
            Err(e) => {
                self.fail_without_agent(&format!("unable to discover OpenCode agents: {e}"))?;
                return Ok(None);
            }
        };
        let current = self.base.agent.trim();
        let default = agents
            .iter()
            .position(|a| a.eq_ignore_ascii_case(current))
            .unwrap_or(0);

        self.draw("", false)?;
        let idx = select_numbered(self.console, "Agent", &agents, Some(default))?;
        Ok(Some(agents[idx].clone()))
    }

    fn ask_timeout(&mut self) -> MenuResult<u32> {
        let default = normalize_timeout_minutes(self.base.timeout_minutes);
        let label = format!("Timeout in minutes (default: {default}): ");
        loop {
            let raw = self.console.prompt_line(&label)?;
            if raw.is_empty() {
                return Ok(default);
            }
            if let Ok(minutes @ 1..) = raw.parse::<u32>() {
                return Ok(minutes);
            }
            self.console
                .print_err("Timeout must be a positive whole number of minutes.")?;
        }
    }

    /// The new cron string (empty when the schedule is disabled), or `None`
    /// if a preset failed to build.
    fn ask_schedule(&mut self) -> MenuResult<Option<String>> {
        let cron = self.base.cron.trim().to_string();
        self.draw("", true)?;
        let enabled = binary_choice(
            self.console,
            "Enable recurring schedule?",
            self.is_new || !cron.is_empty(),
        )?;
        if !enabled {
            return Ok(Some(String::new()));
        }

        let decoded = schedule::decode_preset(&cron);
        let notice = if !cron.is_empty() && decoded.is_none() {
            UNSUPPORTED_SCHEDULE
        } else {
            ""
        };
        let default_mode = decoded
            .as_ref()
            .map_or(ScheduleMode::Daily, |d| d.mode)
            .index();
        let modes: Vec<&str> = ScheduleMode::all().iter().map(|m| m.label()).collect();

        self.draw(notice, true)?;
        let mode_idx = select_numbered(self.console, "Schedule", &modes, Some(default_mode))?;
        let mode = ScheduleMode::all()[mode_idx];

        let time_default = decoded
            .as_ref()
            .map_or(schedule::DEFAULT_TIME_PRESET, |d| {
                schedule::time_preset_index(d.hour, d.minute)
            });
        let built = match mode {
            ScheduleMode::Hourly => {
                let default = decoded
                    .as_ref()
                    .map_or(0, |d| schedule::nearest_quarter_index(d.minute));
                self.draw("", true)?;
                let idx = select_numbered(
                    self.console,
                    "Hourly minute",
                    &schedule::quarter_labels(),
                    Some(default),
                )?;
                schedule::build_hourly(QUARTER_MINUTES[idx])
            }
            ScheduleMode::Daily => {
                self.draw("", true)?;
                let idx = select_numbered(
                    self.console,
                    "Daily time (UTC)",
                    &schedule::time_preset_labels(),
                    Some(time_default),
                )?;
                let preset = &TIME_PRESETS[idx];
                schedule::build_daily(&schedule::format_time(preset.hour, preset.minute))
            }
            ScheduleMode::Weekly => {
                let day_default = decoded
                    .as_ref()
                    .map_or(0, |d| schedule::weekday_preset_index(&d.days));
                self.draw("", true)?;
                let day_idx = select_numbered(
                    self.console,
                    "Weekly days",
                    &schedule::weekday_preset_labels(),
                    Some(day_default),
                )?;
                self.draw("", true)?;
                let time_idx = select_numbered(
                    self.console,
                    "Weekly time (UTC)",
                    &schedule::time_preset_labels(),
                    Some(time_default),
                )?;
                let preset = &TIME_PRESETS[time_idx];
                schedule::build_weekly(
                    WEEKDAY_PRESETS[day_idx].days,
                    &schedule::format_time(preset.hour, preset.minute),
                )
            }
        };

        match built {
            Ok(cron) => Ok(Some(cron)),
            Err(e) => {
                self.fail(&e.to_string())?;
                Ok(None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn draw(&mut self, notice: &str, show_agent: bool) -> MenuResult<()> {
        let count = store::load_tenders(self.root).map_or(0, |t| t.len());
        begin_screen(self.console, SCREEN_HEIGHT)?;
        let out = &mut self.console.out;
        draw_hero(out)?;
        writeln!(out)?;
        draw_meta(out, count)?;
        writeln!(out)?;

        let title = if self.is_new { "Create Tender" } else { "Edit Tender" };
        heading(out, title, CYAN)?;
        rule(out, '-')?;

        let mut context = format!("Current: name={}", pending(&self.draft.name));
        if show_agent {
            context.push_str(&format!(" | agent={}", pending(&self.draft.agent)));
        }
        writeln!(out, "{context}")?;
        if !notice.is_empty() {
            self.console.print_note(notice)?;
        }
        writeln!(self.console.out)?;
        Ok(())
    }

    fn fail(&mut self, msg: &str) -> MenuResult<()> {
        self.draw("", true)?;
        self.console.print_err(msg)?;
        acknowledge(self.console)
    }

    fn fail_without_agent(&mut self, msg: &str) -> MenuResult<()> {
        self.draw("", false)?;
        self.console.print_err(msg)?;
        acknowledge(self.console)
    }
}

fn pending(value: &str) -> &str {
    match value.trim() {
        "" => "(pending)",
        v => v,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::FixedAgents;
    use super::super::MenuError;
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), None)
    }

    fn output(c: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(c.out.into_inner()).unwrap()
    }

    fn agents() -> FixedAgents {
        FixedAgents::of(&["Docs", "TendTests"])
    }

    fn new_base() -> Tender {
        Tender {
            manual: true,
            ..Tender::default()
        }
    }

    #[test]
    fn create_with_defaults() {
        let dir = TempDir::new().unwrap();
        // name, agent 2, push default, timeout default, schedule default,
        // mode default (daily), time default (09:00)
        let mut c = console("nightly\n2\n\n\n\n\n\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &new_base(), true)
            .unwrap()
            .unwrap();
        assert_eq!(t.name, "nightly");
        assert_eq!(t.agent, "TendTests");
        assert_eq!(t.cron, "0 9 * * *");
        assert!(t.manual);
        assert!(!t.push);
        assert_eq!(t.timeout_minutes, 30);
    }

    #[test]
    fn name_prompt_accepts_q_as_data() {
        let dir = TempDir::new().unwrap();
        // name "q", agent 1, push yes, timeout 45, no schedule
        let mut c = console("q\n1\n1\n45\n2\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &new_base(), true)
            .unwrap()
            .unwrap();
        assert_eq!(t.name, "q");
        assert_eq!(t.agent, "Docs");
        assert!(t.push);
        assert_eq!(t.timeout_minutes, 45);
        assert!(t.cron.is_empty());
    }

    #[test]
    fn quit_in_menu_step_cancels_whole_form() {
        let dir = TempDir::new().unwrap();
        let mut c = console("nightly\nq\n");
        let res = input_tender(&mut c, dir.path(), &agents(), &new_base(), true);
        assert!(matches!(res, Err(MenuError::Cancelled)));
    }

    #[test]
    fn blank_name_without_default_discards_draft() {
        let dir = TempDir::new().unwrap();
        let mut c = console("\n1\n");
        let res = input_tender(&mut c, dir.path(), &agents(), &new_base(), true).unwrap();
        assert!(res.is_none());
        assert!(output(c).contains("Name is required."));
    }

    #[test]
    fn discovery_failure_discards_draft() {
        let dir = TempDir::new().unwrap();
        let mut c = console("nightly\n1\n");
        let res = input_tender(&mut c, dir.path(), &FixedAgents(Vec::new()), &new_base(), true).unwrap();
        assert!(res.is_none());
        assert!(output(c).contains("unable to discover OpenCode agents"));
    }

    #[test]
    fn timeout_reprompts_on_bad_input() {
        let dir = TempDir::new().unwrap();
        let mut c = console("nightly\n1\n\n0\nsoon\n15\n2\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &new_base(), true)
            .unwrap()
            .unwrap();
        assert_eq!(t.timeout_minutes, 15);
        let out = output(c);
        assert_eq!(
            out.matches("Timeout must be a positive whole number of minutes.").count(),
            2
        );
    }

    #[test]
    fn edit_defaults_come_from_base() {
        let dir = TempDir::new().unwrap();
        let base = Tender {
            name: "weekly report".into(),
            agent: "tendtests".into(),
            prompt: "summarize".into(),
            cron: "45 6 * * 1,3".into(),
            manual: true,
            push: true,
            timeout_minutes: 20,
            workflow_file: "weekly-report.yml".into(),
        };
        // Accept every default. Weekly days fall back to Mon-Fri and the time
        // to 09:00 since neither matches a preset exactly.
        let mut c = console("\n\n\n\n\n\n\n\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &base, false)
            .unwrap()
            .unwrap();
        assert_eq!(t.name, "weekly report");
        assert_eq!(t.agent, "TendTests");
        assert_eq!(t.prompt, "summarize");
        assert!(t.push);
        assert_eq!(t.timeout_minutes, 20);
        assert_eq!(t.cron, "0 9 * * 1,2,3,4,5");
        assert_eq!(t.workflow_file, "weekly-report.yml");
    }

    #[test]
    fn edit_can_drop_schedule() {
        let dir = TempDir::new().unwrap();
        let base = Tender {
            cron: "0 * * * *".into(),
            workflow_file: "n.yml".into(),
            ..Tender::new("n", "Docs")
        };
        let mut c = console("\n\n\n\n2\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &base, false)
            .unwrap()
            .unwrap();
        assert!(t.cron.is_empty());
        assert!(t.manual);
    }

    #[test]
    fn hourly_preset_from_existing_minute() {
        let dir = TempDir::new().unwrap();
        let base = Tender {
            cron: "22 * * * *".into(),
            ..Tender::new("n", "Docs")
        };
        let mut c = console("\n\n\n\n\n\n\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &base, false)
            .unwrap()
            .unwrap();
        assert_eq!(t.cron, "15 * * * *");
    }

    #[test]
    fn unsupported_cron_shows_notice() {
        let dir = TempDir::new().unwrap();
        let base = Tender {
            cron: "*/5 * * * *".into(),
            ..Tender::new("n", "Docs")
        };
        let mut c = console("\n\n\n\n\n3\n2\n4\n");
        let t = input_tender(&mut c, dir.path(), &agents(), &base, false)
            .unwrap()
            .unwrap();
        assert_eq!(t.cron, "0 12 * * 0,6");
        assert!(output(c).contains(UNSUPPORTED_SCHEDULE));
    }
}
