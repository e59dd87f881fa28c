use crate::output::{print_json, print_tsv};
use anyhow::Context;
use std::path::Path;
use tender_core::{schedule, store};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let tenders = store::load_tenders(root).context("failed to load tenders")?;

    if json {
        return print_json(&tenders);
    }
    if tenders.is_empty() {
        println!("No managed tender workflows found.");
        return Ok(());
    }

    let rows = tenders
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                t.agent.clone(),
                schedule::summarize(&t.cron, t.manual, t.push),
                t.workflow_file.clone(),
            ]
        })
        .collect();
    print_tsv(&["NAME", "AGENT", "TRIGGER", "WORKFLOW"], rows);
    Ok(())
}
