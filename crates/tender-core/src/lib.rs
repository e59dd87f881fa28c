pub mod agents;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod paths;
pub mod process;
pub mod schedule;
pub mod store;
pub mod tender;
pub mod workflow;

pub use error::{Result, TenderError};
pub use tender::Tender;
