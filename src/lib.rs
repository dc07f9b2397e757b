//! Changelog snippet generation and release notification for GitHub pull
//! request workflows.
pub mod changelog;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod orchestrator;
pub mod version;

pub use error::{ChangelingError, Result};
