use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tender_core::{paths, store};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    store::ensure_workflow_dir(root).context("failed to create .github/workflows")?;
    let dir = paths::workflow_dir(root);
    if json {
        print_json(&serde_json::json!({ "workflow_dir": dir }))?;
    } else {
        println!("initialized {}", dir.display());
    }
    Ok(())
}
