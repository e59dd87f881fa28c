use super::{parse_bool_flag, parse_timeout_minutes};
use crate::output::print_json;
use anyhow::{bail, Context};
use clap::{ArgAction, Args};
use std::path::Path;
use tender_core::{store, tender::DEFAULT_TIMEOUT_MINUTES, Tender};

#[derive(Args)]
pub struct AddArgs {
    /// Tender name (or use --name)
    #[arg(value_name = "NAME")]
    positional_name: Option<String>,

    /// Tender name
    #[arg(long, conflicts_with = "positional_name")]
    name: Option<String>,

    /// OpenCode agent (must be a discovered custom primary agent)
    #[arg(long)]
    agent: String,

    /// Default prompt
    #[arg(long, default_value = "")]
    prompt: String,

    /// Cron schedule (5 fields, UTC)
    #[arg(long, default_value = "")]
    cron: String,

    /// Allow on-demand runs (workflow_dispatch)
    #[arg(
        long,
        value_name = "true|false",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_flag
    )]
    manual: bool,

    /// Run on every push to main
    #[arg(
        long,
        value_name = "true|false",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = parse_bool_flag
    )]
    push: bool,

    /// Job timeout in minutes
    #[arg(
        long = "timeout-minutes",
        alias = "timeout",
        value_name = "MINUTES",
        default_value_t = DEFAULT_TIMEOUT_MINUTES,
        value_parser = parse_timeout_minutes
    )]
    timeout_minutes: u32,
}

pub fn run(root: &Path, args: AddArgs, json: bool) -> anyhow::Result<()> {
    let name = args
        .positional_name
        .or(args.name)
        .map(|n| n.trim().to_string())
        .unwrap_or_default();
    if name.is_empty() {
        bail!("a tender name is required (positional <name> or --name)");
    }

    let config = super::load_config(root)?;
    super::require_discovered_agent(root, &config, &args.agent)?;

    let t = Tender {
        name,
        agent: args.agent.trim().to_string(),
        prompt: args.prompt,
        cron: args.cron.trim().to_string(),
        manual: args.manual,
        push: args.push,
        timeout_minutes: args.timeout_minutes,
        workflow_file: String::new(),
    };
    let saved = store::create_tender(root, t).context("failed to save tender")?;

    if json {
        print_json(&saved)?;
    } else {
        println!("saved {}", saved.workflow_file);
    }
    Ok(())
}
