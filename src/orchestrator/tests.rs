//! Tests for the orchestrator module.
//!
//! Test organization:
//! - `common`: Shared test utilities and helper functions
//! - `release_workflow`: Fragment aggregation, versioning and notifications
//! - `snippet_workflow`: Generating and renaming changelog snippets
//! - `label_workflow`: Category label synchronization

mod common;
mod snippet_workflow;
