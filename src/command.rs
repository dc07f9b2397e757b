//! Command execution for Changeling.
//!
//! Each subcommand loads the configuration, connects to GitHub and the local
//! repository, and hands off to the [`Orchestrator`](crate::orchestrator::Orchestrator).
//!
//! Commands support dry-run mode through the `--dry-run` CLI flag, which logs
//! comments, label changes, snippet files and commits instead of making them.

/// Shared setup used by every command.
pub mod common;

/// Implements `add-changelog-snippet`.
pub mod add_snippet;

/// Implements `release`, including the version outputs it emits.
pub mod release;

/// Implements `sync-labels`.
pub mod sync_labels;
