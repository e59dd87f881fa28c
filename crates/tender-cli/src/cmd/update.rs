use super::{parse_bool_flag, parse_timeout_minutes};
use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Args;
use std::path::Path;
use tender_core::{store, Tender};

#[derive(Args)]
pub struct UpdateArgs {
    /// Current tender name
    target: String,

    /// New tender name
    #[arg(long)]
    name: Option<String>,

    /// OpenCode agent
    #[arg(long)]
    agent: Option<String>,

    /// Default prompt (empty string clears it)
    #[arg(long)]
    prompt: Option<String>,

    /// Cron schedule (5 fields, UTC)
    #[arg(long, conflicts_with = "clear_cron")]
    cron: Option<String>,

    /// Remove the schedule
    #[arg(long)]
    clear_cron: bool,

    /// Allow on-demand runs (workflow_dispatch)
    #[arg(long, value_name = "true|false", value_parser = parse_bool_flag)]
    manual: Option<bool>,

    /// Run on every push to main
    #[arg(long, value_name = "true|false", value_parser = parse_bool_flag)]
    push: Option<bool>,

    /// Job timeout in minutes
    #[arg(
        long = "timeout-minutes",
        alias = "timeout",
        value_name = "MINUTES",
        value_parser = parse_timeout_minutes
    )]
    timeout_minutes: Option<u32>,
}

impl UpdateArgs {
    /// Overlay the provided flags onto `current`. Returns `None` when no flag
    /// changes anything.
    fn apply(&self, current: &Tender) -> Option<Tender> {
        let mut updated = current.clone();
        let mut changed = false;

        if let Some(name) = &self.name {
            updated.name = name.trim().to_string();
            changed = true;
        }
        if let Some(agent) = &self.agent {
            updated.agent = agent.trim().to_string();
            changed = true;
        }
        if let Some(prompt) = &self.prompt {
            updated.prompt = prompt.clone();
            changed = true;
        }
        if let Some(cron) = &self.cron {
            updated.cron = cron.trim().to_string();
            changed = true;
        }
        if self.clear_cron {
            updated.cron.clear();
            changed = true;
        }
        if let Some(manual) = self.manual {
            updated.manual = manual;
            changed = true;
        }
        if let Some(push) = self.push {
            updated.push = push;
            changed = true;
        }
        if let Some(minutes) = self.timeout_minutes {
            updated.timeout_minutes = minutes;
            changed = true;
        }

        changed.then_some(updated)
    }
}

pub fn run(root: &Path, args: UpdateArgs, json: bool) -> anyhow::Result<()> {
    let current = store::find_tender(root, &args.target)?;
    let Some(updated) = args.apply(&current) else {
        bail!("no update flags were provided");
    };

    let config = super::load_config(root)?;
    super::require_discovered_agent(root, &config, &updated.agent)?;

    let saved = store::update_tender(root, &args.target, updated)
        .with_context(|| format!("failed to update tender '{}'", args.target.trim()))?;
    if json {
        print_json(&saved)?;
    } else {
        println!("updated {}", saved.workflow_file);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: UpdateArgs,
    }

    fn parse(argv: &[&str]) -> UpdateArgs {
        let mut full = vec!["update"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    fn existing() -> Tender {
        Tender {
            cron: "0 9 * * *".into(),
            workflow_file: "nightly.yml".into(),
            ..Tender::new("nightly", "TendTests")
        }
    }

    #[test]
    fn no_flags_is_no_change() {
        assert!(parse(&["nightly"]).apply(&existing()).is_none());
    }

    #[test]
    fn clear_cron_and_toggle() {
        let updated = parse(&["nightly", "--clear-cron", "--push", "true"])
            .apply(&existing())
            .unwrap();
        assert!(updated.cron.is_empty());
        assert!(updated.push);
        assert!(updated.manual);
        assert_eq!(updated.workflow_file, "nightly.yml");
    }

    #[test]
    fn empty_prompt_clears() {
        let mut base = existing();
        base.prompt = "old".into();
        let updated = parse(&["nightly", "--prompt", ""]).apply(&base).unwrap();
        assert!(updated.prompt.is_empty());
    }

    #[test]
    fn cron_conflicts_with_clear_cron() {
        let res = Harness::try_parse_from(["update", "nightly", "--cron", "0 * * * *", "--clear-cron"]);
        assert!(res.is_err());
    }

    #[test]
    fn timeout_alias() {
        let updated = parse(&["nightly", "--timeout", "45"]).apply(&existing()).unwrap();
        assert_eq!(updated.timeout_minutes, 45);
    }
}
