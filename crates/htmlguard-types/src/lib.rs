//! Stable DTOs shared across the htmlguard workspace.
//!
//! This crate is intentionally boring:
//! - the filtering strategy and the workspace names a policy is keyed by
//! - the result model produced by sanitize/validate calls

#![forbid(unsafe_code)]

pub mod report;
pub mod strategy;

pub use report::{
    RejectionReport, SanitizationResult, ValidationResult, ValidationResultBuilder,
};
pub use strategy::{EDIT_WORKSPACE, LIVE_WORKSPACE, Strategy, Workspace};
