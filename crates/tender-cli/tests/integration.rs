#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tender(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tender").unwrap();
    cmd.current_dir(dir.path())
        .env("TENDER_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Point the project config at a fake `opencode` that lists a fixed set of
/// agents.
#[cfg(unix)]
fn fake_opencode(dir: &TempDir) {
    use std::os::unix::fs::PermissionsExt;

    let bin = dir.path().join("fake-opencode");
    std::fs::write(
        &bin,
        "#!/bin/sh\n\
         if [ \"$1\" = agent ] && [ \"$2\" = list ]; then\n\
         printf 'TendTests (primary)\\nhelper (subagent)\\nbuild (primary)\\nDocs\\n'\n\
         exit 0\n\
         fi\n\
         exit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

    std::fs::create_dir_all(dir.path().join(".tender")).unwrap();
    std::fs::write(
        dir.path().join(".tender/config.yaml"),
        format!("opencode_bin: {}\n", bin.display()),
    )
    .unwrap();
}

#[cfg(unix)]
fn add_nightly(dir: &TempDir) {
    tender(dir)
        .args(["add", "nightly", "--agent", "TendTests", "--cron", "30 9 * * *"])
        .assert()
        .success()
        .stdout("saved nightly.yml\n");
}

fn workflow(dir: &TempDir, file: &str) -> String {
    std::fs::read_to_string(dir.path().join(".github/workflows").join(file)).unwrap()
}

// ---------------------------------------------------------------------------
// tender init / ls
// ---------------------------------------------------------------------------

#[test]
fn init_creates_workflow_dir() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("initialized "));
    assert!(dir.path().join(".github/workflows").is_dir());

    // idempotent
    tender(&dir).arg("init").assert().success();
}

#[test]
fn ls_empty() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout("No managed tender workflows found.\n");
}

#[test]
fn ls_skips_foreign_workflows() {
    let dir = TempDir::new().unwrap();
    let wf = dir.path().join(".github/workflows");
    std::fs::create_dir_all(&wf).unwrap();
    std::fs::write(wf.join("ci.yml"), "name: CI\non: push\njobs: {}\n").unwrap();
    tender(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout("No managed tender workflows found.\n");
}

#[test]
fn rust_log_debug_is_honoured() {
    let dir = TempDir::new().unwrap();
    let wf = dir.path().join(".github/workflows");
    std::fs::create_dir_all(&wf).unwrap();
    std::fs::write(wf.join("ci.yml"), "name: CI\non: push\njobs: {}\n").unwrap();

    tender(&dir)
        .arg("ls")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping unmanaged workflow").not());
    tender(&dir)
        .env("RUST_LOG", "debug")
        .arg("ls")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping unmanaged workflow"));
}

// ---------------------------------------------------------------------------
// tender add
// ---------------------------------------------------------------------------

#[test]
fn add_rejects_reserved_agent() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .args(["add", "nightly", "--agent", "Build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "agent 'Build' is reserved; choose a custom agent",
        ));
}

#[test]
fn add_requires_agent_flag() {
    let dir = TempDir::new().unwrap();
    tender(&dir).args(["add", "nightly"]).assert().code(2);
}

#[test]
fn add_reports_missing_opencode() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".tender")).unwrap();
    std::fs::write(
        dir.path().join(".tender/config.yaml"),
        "opencode_bin: /nonexistent/opencode\n",
    )
    .unwrap();
    tender(&dir)
        .args(["add", "nightly", "--agent", "TendTests"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to discover custom agents"));
}

#[cfg(unix)]
#[test]
fn add_then_ls() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    add_nightly(&dir);

    let content = workflow(&dir, "nightly.yml");
    assert!(content.contains("tender/nightly"));
    assert!(content.contains("cron: \"30 9 * * *\""));

    tender(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(
            "NAME\tAGENT\tTRIGGER\tWORKFLOW\n\
             nightly\tTendTests\tdaily at 09:30 UTC + on-demand\tnightly.yml\n",
        );
}

#[cfg(unix)]
#[test]
fn add_with_name_flag_and_triggers() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    tender(&dir)
        .args([
            "add",
            "--name",
            "On Push",
            "--agent",
            "docs",
            "--manual",
            "false",
            "--push",
            "true",
            "--timeout",
            "45",
        ])
        .assert()
        .success()
        .stdout("saved on-push.yml\n");

    let content = workflow(&dir, "on-push.yml");
    assert!(!content.contains("  workflow_dispatch:"));
    assert!(content.contains("timeout-minutes: 45"));

    tender(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("On Push\tdocs\ton-push(main)\ton-push.yml"));
}

#[cfg(unix)]
#[test]
fn add_rejects_unknown_and_subagents() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    for agent in ["ghost", "helper"] {
        tender(&dir)
            .args(["add", "nightly", "--agent", agent])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "is not a discovered custom primary agent",
            ));
    }
}

#[cfg(unix)]
#[test]
fn add_rejects_duplicates_and_unrunnable() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    add_nightly(&dir);

    tender(&dir)
        .args(["add", "NIGHTLY", "--agent", "TendTests"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    tender(&dir)
        .args(["add", "idle", "--agent", "TendTests", "--manual", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("enable manual, push, or set a schedule"));
}

#[test]
fn add_rejects_bad_flag_values() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .args(["add", "n", "--agent", "x", "--manual", "maybe"])
        .assert()
        .code(2);
    tender(&dir)
        .args(["add", "n", "--agent", "x", "--timeout-minutes", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout-minutes must be greater than 0"));
}

// ---------------------------------------------------------------------------
// tender update
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn update_renames_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    add_nightly(&dir);

    tender(&dir)
        .args(["update", "nightly", "--name", "Late Night", "--clear-cron"])
        .assert()
        .success()
        .stdout("updated nightly.yml\n");

    tender(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Late Night\tTendTests\ton-demand\tnightly.yml"));
}

#[cfg(unix)]
#[test]
fn update_requires_a_change() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    add_nightly(&dir);
    tender(&dir)
        .args(["update", "nightly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no update flags were provided"));
}

#[test]
fn update_unknown_tender() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .args(["update", "ghost", "--push", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tender 'ghost' not found"));
}

#[test]
fn update_cron_conflicts_with_clear() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .args(["update", "n", "--cron", "0 * * * *", "--clear-cron"])
        .assert()
        .code(2);
}

// ---------------------------------------------------------------------------
// tender rm / run
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn rm_confirms_unless_yes() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    add_nightly(&dir);

    tender(&dir)
        .args(["rm", "nightly"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(y/N)").and(predicate::str::ends_with("cancelled\n")));
    assert!(dir.path().join(".github/workflows/nightly.yml").exists());

    tender(&dir)
        .args(["rm", "--yes", "nightly"])
        .assert()
        .success()
        .stdout("deleted nightly\n");
    assert!(!dir.path().join(".github/workflows/nightly.yml").exists());
}

#[cfg(unix)]
#[test]
fn run_rejects_push_only() {
    let dir = TempDir::new().unwrap();
    fake_opencode(&dir);
    tender(&dir)
        .args(["add", "push-only", "--agent", "TendTests", "--manual", "false", "--push", "true"])
        .assert()
        .success();

    tender(&dir)
        .args(["run", "push-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "tender 'push-only' does not allow on-demand runs; enable workflow_dispatch to use 'tender run'",
        ));
}

#[test]
fn run_unknown_tender() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .args(["run", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// interactive
// ---------------------------------------------------------------------------

#[test]
fn dashboard_quits_cleanly() {
    let dir = TempDir::new().unwrap();
    tender(&dir)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Select Tender"))
        .stderr(predicate::str::is_empty());
    assert!(dir.path().join(".github/workflows").is_dir());
}

#[test]
fn dashboard_rejects_empty_slot() {
    let dir = TempDir::new().unwrap();
    let wf = dir.path().join(".github/workflows");
    std::fs::create_dir_all(&wf).unwrap();
    tender(&dir)
        .write_stdin("7\nQ\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid selection."));
}
