//! Interactive dashboard: a synchronous prompt loop over the workflow
//! directory.

mod console;
mod form;
mod home;
mod screen;
mod select;
mod terminal;

pub use console::Console;
pub use terminal::{CrosstermKeys, KeyInput};

use anyhow::Context;
use std::io::{self, IsTerminal};
use std::path::Path;
use tender_core::{agents::OpenCodeAgents, store, TenderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    /// The user pressed the quit key. Not a failure; never printed.
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Core(#[from] TenderError),
}

pub type MenuResult<T> = std::result::Result<T, MenuError>;

/// Run the dashboard on the process terminal until the user quits.
pub fn run(root: &Path) -> anyhow::Result<()> {
    store::ensure_workflow_dir(root).context("failed to create .github/workflows")?;
    let config = crate::cmd::load_config(root)?;
    let agents = OpenCodeAgents::new(root, &config);

    let stdin = io::stdin();
    let keys: Option<Box<dyn KeyInput>> = if stdin.is_terminal() {
        Some(Box::new(CrosstermKeys))
    } else {
        None
    };
    let mut console = Console::new(stdin.lock(), io::stdout().lock(), keys);

    match home::run_interactive(root, &agents, &mut console) {
        Ok(()) | Err(MenuError::Cancelled) => Ok(()),
        Err(e) => Err(e).context("interactive session failed"),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use tender_core::{agents::AgentSource, Result, TenderError};

    /// Discovery double returning a fixed list; empty behaves like a runner
    /// that listed nothing usable.
    pub struct FixedAgents(pub Vec<String>);

    impl FixedAgents {
        pub fn of(names: &[&str]) -> Self {
            Self(names.iter().map(|n| n.to_string()).collect())
        }
    }

    impl AgentSource for FixedAgents {
        fn discover(&self) -> Result<Vec<String>> {
            if self.0.is_empty() {
                return Err(TenderError::NoUsableAgents);
            }
            Ok(self.0.clone())
        }
    }
}
