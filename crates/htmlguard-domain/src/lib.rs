//! Pure policy compilation and evaluation (no IO).
//!
//! Input: a validated [`spec::ConfigurationDocument`] built elsewhere.
//! Output: immutable [`Policy`] values that sanitize or validate rich-text markup.

#![forbid(unsafe_code)]

pub mod content;
pub mod policy;
pub mod rules;
pub mod scope;
pub mod site;
pub mod spec;

mod sanitize;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use content::{ContentNode, PropertyKind};
pub use policy::{Policy, PolicyError};
pub use rules::{CompiledMatcher, RuleError};
pub use scope::{CompiledScopeMap, ScopeEntry, ScopeError, ScopeTarget};
pub use site::{CompileError, SiteConfig, compile_site};
pub use spec::{ConfigurationDocument, ElementRule, FormatTable, PolicySpec, RuleSet};
