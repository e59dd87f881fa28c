pub mod add;
pub mod init;
pub mod ls;
pub mod rm;
pub mod run;
pub mod update;

use anyhow::Context;
use tender_core::{
    agents::{discover_primary_agents, require_custom_agent},
    config::Config,
    tender::is_system_agent,
    TenderError,
};
use std::path::Path;

pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load .tender/config.yaml")
}

/// Ensure `name` is a custom primary agent known to OpenCode. An empty name is
/// left for record validation to report.
pub fn require_discovered_agent(root: &Path, config: &Config, name: &str) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(());
    }
    if is_system_agent(name) {
        return Err(TenderError::ReservedAgent(name.to_string()).into());
    }
    let agents =
        discover_primary_agents(root, config).context("unable to discover custom agents")?;
    require_custom_agent(name, &agents)?;
    Ok(())
}

/// Parse `true`/`false` flag values, accepting `1`/`0` and `t`/`f` as well.
pub fn parse_bool_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        "" => Err("requires true or false".to_string()),
        _ => Err(format!("invalid value '{raw}' (expected true/false)")),
    }
}

pub fn parse_timeout_minutes(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n).map_err(|_| "timeout-minutes is too large".to_string()),
        Ok(_) => Err("timeout-minutes must be greater than 0".to_string()),
        Err(_) => Err(format!("invalid timeout-minutes '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_flags() {
        assert_eq!(parse_bool_flag("true"), Ok(true));
        assert_eq!(parse_bool_flag(" FALSE "), Ok(false));
        assert_eq!(parse_bool_flag("1"), Ok(true));
        assert!(parse_bool_flag("").is_err());
        assert!(parse_bool_flag("yes").is_err());
    }

    #[test]
    fn timeout_flags() {
        assert_eq!(parse_timeout_minutes("45"), Ok(45));
        assert_eq!(
            parse_timeout_minutes("0"),
            Err("timeout-minutes must be greater than 0".to_string())
        );
        assert!(parse_timeout_minutes("-3").is_err());
        assert!(parse_timeout_minutes("soon").is_err());
    }

    #[test]
    fn reserved_agent_rejected_before_discovery() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            opencode_bin: "definitely-not-installed-opencode".into(),
            ..Config::default()
        };
        let err = require_discovered_agent(dir.path(), &config, "Build").unwrap_err();
        assert_eq!(err.to_string(), "agent 'Build' is reserved; choose a custom agent");
    }
}
