//! Discovery of custom primary agents via `opencode agent list`.

use crate::config::Config;
use crate::error::{Result, TenderError};
use crate::process;
use crate::tender::is_system_agent;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

static ANSI_RE: OnceLock<Regex> = OnceLock::new();
static AGENT_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn ansi_re() -> &'static Regex {
    ANSI_RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap())
}

fn agent_name_re() -> &'static Regex {
    AGENT_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap())
}

/// Source of selectable agents. The interactive form depends on this rather
/// than on the external CLI so it can be driven with a fixed list.
pub trait AgentSource {
    fn discover(&self) -> Result<Vec<String>>;
}

/// Agents listed by the configured OpenCode binary, run from `root`.
pub struct OpenCodeAgents {
    root: PathBuf,
    config: Config,
}

impl OpenCodeAgents {
    pub fn new(root: &Path, config: &Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config: config.clone(),
        }
    }
}

impl AgentSource for OpenCodeAgents {
    fn discover(&self) -> Result<Vec<String>> {
        discover_primary_agents(&self.root, &self.config)
    }
}

/// Sorted, deduplicated custom primary agents. Fails when the CLI is missing,
/// exits non-zero, times out, or lists nothing usable.
pub fn discover_primary_agents(root: &Path, config: &Config) -> Result<Vec<String>> {
    let mut cmd = Command::new(&config.opencode_bin);
    cmd.args(["agent", "list"]).current_dir(root);

    let output = process::run_with_timeout(cmd, config.external_timeout())
        .map_err(|e| TenderError::AgentListFailed(e.to_string()))?;
    if !output.status.success() {
        return Err(TenderError::AgentListFailed(format!(
            "exited with {}",
            output.status
        )));
    }

    let agents = parse_agent_list(&output.stdout);
    if agents.is_empty() {
        return Err(TenderError::NoUsableAgents);
    }
    Ok(agents)
}

/// Reject reserved names and names absent from `agents` (case-insensitive).
pub fn require_custom_agent(name: &str, agents: &[String]) -> Result<()> {
    let name = name.trim();
    if is_system_agent(name) {
        return Err(TenderError::ReservedAgent(name.to_string()));
    }
    if agents.iter().any(|a| a.trim().eq_ignore_ascii_case(name)) {
        return Ok(());
    }
    Err(TenderError::UnknownAgent(name.to_string()))
}

// ---------------------------------------------------------------------------
// Output parsing
// ---------------------------------------------------------------------------

/// Parse `agent list` output, JSON or line-oriented text.
pub fn parse_agent_list(out: &str) -> Vec<String> {
    let text = ansi_re().replace_all(out, "");
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.starts_with('[') || text.starts_with('{') {
        let from_json = parse_agent_list_json(text);
        if !from_json.is_empty() {
            return from_json;
        }
    }

    let mut set = BTreeSet::new();
    for line in text.lines() {
        if let Some(name) = parse_agent_line(line) {
            set.insert(name);
        }
    }
    set.into_iter().collect()
}

const SKIP_PREFIXES: &[&str] = &[
    "opencode agent list",
    "list all available agents",
    "options:",
    "error ",
    "error:",
];

fn parse_agent_line(line: &str) -> Option<String> {
    let line = line.trim();
    let lower = line.to_lowercase();
    if line.is_empty() || SKIP_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }

    let mut fields = line.split_whitespace();
    let first = fields.next()?;
    if first.eq_ignore_ascii_case("name") || first.eq_ignore_ascii_case("agent") {
        return None;
    }

    // "<name> (mode)" or "<name> mode"; anything after the tag is ignored.
    let (name, mode) = match first.split_once('(') {
        Some((name, rest)) => (name, Some(rest.trim_end_matches(')').to_string())),
        None => (
            first,
            fields
                .next()
                .map(|m| m.trim_matches(|c| c == '(' || c == ')').to_string()),
        ),
    };
    if let Some(mode) = mode.filter(|m| !m.is_empty()) {
        if !mode.eq_ignore_ascii_case("primary") {
            return None;
        }
    }
    accept(name)
}

fn parse_agent_list_json(text: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    let items: Vec<&Value> = match &value {
        Value::Array(arr) => arr.iter().collect(),
        Value::Object(obj) => ["agents", "items", "data"]
            .iter()
            .filter_map(|k| obj.get(*k).and_then(Value::as_array))
            .flatten()
            .collect(),
        _ => Vec::new(),
    };

    let mut set = BTreeSet::new();
    for item in items {
        let (name, mode) = match item {
            Value::String(s) => (accept(s), None),
            Value::Object(obj) => (
                ["name", "agent", "id"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(Value::as_str).and_then(accept)),
                obj.get("mode").and_then(Value::as_str),
            ),
            _ => (None, None),
        };
        if mode.is_some_and(|m| !m.trim().is_empty() && !m.trim().eq_ignore_ascii_case("primary")) {
            continue;
        }
        if let Some(name) = name {
            set.insert(name);
        }
    }
    set.into_iter().collect()
}

fn accept(name: &str) -> Option<String> {
    let name = name.trim();
    if !agent_name_re().is_match(name) || is_system_agent(name) {
        return None;
    }
    Some(name.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
