//! Use case orchestration for htmlguard.
//!
//! This crate provides the application layer: the process-wide policy registry and the use
//! cases built on it. It is intentionally thin and delegates compilation and evaluation to the
//! settings and domain layers.

#![forbid(unsafe_code)]

mod interceptor;
mod registry;
mod validator;

pub use interceptor::{SanitizeInterceptor, WriteContext};
pub use registry::{ConfigTarget, PolicyRegistry, PolicyResolver, UpdateError};
pub use validator::{NodeValidation, NodeValidator};
