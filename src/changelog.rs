//! Changelog snippet rendering and pending fragment discovery.

/// Fragment file naming and directory scanning.
pub mod fragment;

/// Markdown rendering of a single changelog entry.
pub mod snippet;
