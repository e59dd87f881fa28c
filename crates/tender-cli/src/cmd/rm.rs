use crate::output::print_json;
use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::Path;
use tender_core::store;

pub fn run(root: &Path, name: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes {
        let path = store::managed_workflow_path(root, name)?;
        print!("Delete tender \"{name}\" ({})? (y/N): ", path.display());
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read confirmation")?;
        if !is_confirmation(&line) {
            println!("cancelled");
            return Ok(());
        }
    }

    let removed = store::remove_tender(root, name)
        .with_context(|| format!("failed to remove tender '{}'", name.trim()))?;
    if json {
        print_json(&removed)?;
    } else {
        println!("deleted {name}");
    }
    Ok(())
}

fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
