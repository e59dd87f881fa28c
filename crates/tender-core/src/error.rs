use thiserror::Error;

#[derive(Debug, Error)]
pub enum TenderError {
    #[error("name is required")]
    NameRequired,

    #[error("agent is required")]
    AgentRequired,

    #[error("name cannot contain {0}")]
    InvalidName(&'static str),

    #[error("agent '{0}' is reserved; choose a custom agent")]
    ReservedAgent(String),

    #[error("agent '{0}' is not a discovered custom primary agent")]
    UnknownAgent(String),

    #[error("cron must have 5 fields")]
    InvalidCron,

    #[error("enable manual, push, or set a schedule")]
    Unrunnable,

    #[error("{0}")]
    InvalidSchedule(String),

    #[error("tender '{0}' not found")]
    TenderNotFound(String),

    #[error("tender '{0}' already exists")]
    TenderExists(String),

    #[error("unable to find available workflow filename for '{0}'")]
    NoWorkflowFileAvailable(String),

    #[error("opencode agent list failed: {0}")]
    AgentListFailed(String),

    #[error("opencode agent list returned no usable agents")]
    NoUsableAgents,

    #[error("tender '{0}' does not allow on-demand runs; enable workflow_dispatch to use 'tender run'")]
    ManualDisabled(String),

    #[error("GitHub CLI 'gh' is required to run a tender now")]
    GhNotInstalled,

    #[error("gh workflow dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("'{command}' did not finish within {secs}s")]
    ExternalTimeout { command: String, secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TenderError>;
