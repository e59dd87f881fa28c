use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use tender_core::dispatch;

pub fn run(root: &Path, name: &str, prompt: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let t = dispatch::dispatch_tender(root, &config, name, prompt)
        .with_context(|| format!("failed to run tender '{}'", name.trim()))?;
    if json {
        print_json(&t)?;
    } else {
        println!("triggered {name}");
    }
    Ok(())
}
