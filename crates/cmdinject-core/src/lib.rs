//! Command-injection lab core
//!
//! Command construction, input filtering and subprocess execution shared by
//! the vulnerable and the hardened HTTP routes.

pub mod blacklist;
pub mod config;
pub mod error;
pub mod executor;
pub mod strategy;

pub use blacklist::Blacklist;
pub use config::Config;
pub use error::{Error, Result};
pub use executor::{CommandExecutor, CommandResult, ProcessExecutor};
pub use strategy::CommandExecutionStrategy;
