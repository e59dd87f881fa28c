use crate::error::{Result, TenderError};
use serde::Serialize;
use std::cmp::Ordering;

/// Job timeout applied when a record carries no positive value.
pub const DEFAULT_TIMEOUT_MINUTES: u32 = 30;

/// Built-in OpenCode agents that may not back a tender.
pub const SYSTEM_AGENTS: &[&str] = &[
    "build",
    "plan",
    "general",
    "explore",
    "title",
    "summary",
    "compaction",
];

pub fn is_system_agent(name: &str) -> bool {
    let name = name.trim();
    SYSTEM_AGENTS.iter().any(|a| a.eq_ignore_ascii_case(name))
}

pub fn normalize_timeout_minutes(minutes: u32) -> u32 {
    if minutes == 0 {
        DEFAULT_TIMEOUT_MINUTES
    } else {
        minutes
    }
}

// ---------------------------------------------------------------------------
// Tender
// ---------------------------------------------------------------------------

/// A scheduled or on-demand agent run, persisted as one workflow document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tender {
    pub name: String,
    pub agent: String,
    pub prompt: String,
    pub cron: String,
    pub manual: bool,
    pub push: bool,
    /// Zero means unset; see [`Tender::timeout`].
    pub timeout_minutes: u32,
    /// Storage key: the document filename. Assigned on creation and kept
    /// across renames.
    pub workflow_file: String,
}

impl Tender {
    pub fn new(name: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent: agent.into(),
            manual: true,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> u32 {
        normalize_timeout_minutes(self.timeout_minutes)
    }

    pub fn has_schedule(&self) -> bool {
        !self.cron.trim().is_empty()
    }

    /// Trim identifying fields and substitute the default timeout. The prompt is
    /// free text and kept verbatim.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            agent: self.agent.trim().to_string(),
            prompt: self.prompt.clone(),
            cron: self.cron.trim().to_string(),
            manual: self.manual,
            push: self.push,
            timeout_minutes: self.timeout(),
            workflow_file: self.workflow_file.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TenderError::NameRequired);
        }
        let agent = self.agent.trim();
        if agent.is_empty() {
            return Err(TenderError::AgentRequired);
        }
        if name.contains(['\r', '\n']) {
            return Err(TenderError::InvalidName("newlines"));
        }
        if name.contains('/') {
            return Err(TenderError::InvalidName("'/'"));
        }
        if is_system_agent(agent) {
            return Err(TenderError::ReservedAgent(agent.to_string()));
        }
        if self.has_schedule() && self.cron.split_whitespace().count() != 5 {
            return Err(TenderError::InvalidCron);
        }
        if !self.manual && !self.push && !self.has_schedule() {
            return Err(TenderError::Unrunnable);
        }
        Ok(())
    }

    /// Case-insensitive name comparison used for lookups and uniqueness.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Listing order: name, then storage key.
pub fn listing_order(a: &Tender, b: &Tender) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.workflow_file.cmp(&b.workflow_file))
}

pub fn sort_tenders(tenders: &mut [Tender]) {
    tenders.sort_by(listing_order);
}

pub fn find_index(tenders: &[Tender], name: &str) -> Option<usize> {
    tenders.iter().position(|t| t.matches_name(name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
