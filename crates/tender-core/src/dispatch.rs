//! On-demand runs through `gh workflow run`.

use crate::config::Config;
use crate::error::{Result, TenderError};
use crate::process;
use crate::store;
use crate::tender::Tender;
use std::path::Path;
use std::process::Command;

/// Trigger the workflow behind `name` now, optionally overriding its prompt.
/// Returns the dispatched record.
pub fn dispatch_tender(
    root: &Path,
    config: &Config,
    name: &str,
    prompt: Option<&str>,
) -> Result<Tender> {
    let t = store::find_tender(root, name)?;
    if !t.manual {
        return Err(TenderError::ManualDisabled(t.name));
    }

    let gh = which::which(&config.gh_bin).map_err(|_| TenderError::GhNotInstalled)?;
    let mut cmd = Command::new(gh);
    cmd.args(gh_workflow_run_args(&t, prompt)).current_dir(root);

    let output = process::run_with_timeout(cmd, config.external_timeout())
        .map_err(|e| TenderError::DispatchFailed(e.to_string()))?;
    if !output.status.success() {
        let detail = output.stderr.trim();
        let detail = if detail.is_empty() {
            format!("exited with {}", output.status)
        } else {
            detail.to_string()
        };
        return Err(TenderError::DispatchFailed(detail));
    }
    tracing::info!(file = %t.workflow_file, "dispatched tender workflow");
    Ok(t)
}

pub fn gh_workflow_run_args(t: &Tender, prompt: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "workflow".to_string(),
        "run".to_string(),
        t.workflow_file.clone(),
    ];
    if let Some(prompt) = prompt.map(str::trim).filter(|p| !p.is_empty()) {
        args.push("-f".to_string());
        args.push(format!("prompt={prompt}"));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn saved(root: &Path, manual: bool) -> Tender {
        let t = Tender {
            manual,
            push: !manual,
            ..Tender::new("nightly", "TendTests")
        };
        store::create_tender(root, t).unwrap()
    }

    #[test]
    fn args_without_prompt() {
        let t = Tender {
            workflow_file: "nightly.yml".into(),
            ..Tender::default()
        };
        assert_eq!(gh_workflow_run_args(&t, None), ["workflow", "run", "nightly.yml"]);
        assert_eq!(gh_workflow_run_args(&t, Some("   ")), ["workflow", "run", "nightly.yml"]);
    }

    #[test]
    fn args_with_prompt() {
        let t = Tender {
            workflow_file: "nightly.yml".into(),
            ..Tender::default()
        };
        assert_eq!(
            gh_workflow_run_args(&t, Some(" fix flaky tests ")),
            ["workflow", "run", "nightly.yml", "-f", "prompt=fix flaky tests"]
        );
    }

    #[test]
    fn rejects_push_only() {
        let dir = TempDir::new().unwrap();
        saved(dir.path(), false);
        let err = dispatch_tender(dir.path(), &Config::default(), "nightly", Some("x")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "tender 'nightly' does not allow on-demand runs; enable workflow_dispatch to use 'tender run'"
        );
    }

    #[test]
    fn rejects_unknown_tender() {
        let dir = TempDir::new().unwrap();
        let err = dispatch_tender(dir.path(), &Config::default(), "ghost", None).unwrap_err();
        assert!(matches!(err, TenderError::TenderNotFound(_)));
    }

    #[test]
    fn missing_gh_is_reported() {
        let dir = TempDir::new().unwrap();
        saved(dir.path(), true);
        let config = Config {
            gh_bin: dir.path().join("no-gh-here").to_string_lossy().into_owned(),
            ..Config::default()
        };
        let err = dispatch_tender(dir.path(), &config, "nightly", None).unwrap_err();
        assert!(matches!(err, TenderError::GhNotInstalled));
    }

    #[cfg(unix)]
    #[test]
    fn passes_args_and_reports_failure() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        saved(dir.path(), true);
        let log = dir.path().join("gh.log");
        let gh = dir.path().join("gh");
        std::fs::write(
            &gh,
            format!(
                "#!/bin/sh\necho \"$@\" > '{}'\nif [ \"$5\" = \"prompt=fail\" ]; then echo boom >&2; exit 1; fi\n",
                log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&gh, std::fs::Permissions::from_mode(0o755)).unwrap();
        let config = Config {
            gh_bin: gh.to_string_lossy().into_owned(),
            ..Config::default()
        };

        dispatch_tender(dir.path(), &config, "nightly", Some("go")).unwrap();
        assert_eq!(
            std::fs::read_to_string(&log).unwrap().trim(),
            "workflow run nightly.yml -f prompt=go"
        );

        let err = dispatch_tender(dir.path(), &config, "nightly", Some("fail")).unwrap_err();
        assert_eq!(err.to_string(), "gh workflow dispatch failed: boom");
    }
}
