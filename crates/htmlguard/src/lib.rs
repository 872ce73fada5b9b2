//! Per-site HTML content-security policies for rich-text fields.
//!
//! A configuration document declares, per workspace, which content properties are filtered and
//! which tags, attributes, attribute formats and URL protocols survive. Documents are validated
//! and compiled into immutable [`Policy`] values, published through a [`PolicyRegistry`], and
//! applied either by sanitizing on write ([`SanitizeInterceptor`]) or by rejecting invalid
//! nodes ([`NodeValidator`]).
//!
//! ```
//! use htmlguard::{PolicyRegistry, PolicyResolver};
//!
//! let registry = PolicyRegistry::new();
//! registry.on_configuration_changed(
//!     "org.jahia.modules.htmlfiltering.site-acme.yml",
//!     Some(
//!         "htmlFiltering:
//!   editWorkspace: &ws
//!     strategy: sanitize
//!     process: ['nt:base.*']
//!     allowedRuleSet:
//!       elements:
//!         - tags: [h1, p]
//!   liveWorkspace: *ws
//! ",
//!     ),
//! )?;
//!
//! let policy = registry.resolve_policy("acme", "live").expect("site policy");
//! let result = policy.sanitize("<h1>title</h1><h2>sub</h2>");
//! assert_eq!(result.sanitized_html(), "<h1>title</h1>sub");
//! assert!(result.rejected_tags().contains("h2"));
//! # Ok::<(), htmlguard::UpdateError>(())
//! ```

#![forbid(unsafe_code)]

pub use htmlguard_app::{
    ConfigTarget, NodeValidation, NodeValidator, PolicyRegistry, PolicyResolver,
    SanitizeInterceptor, UpdateError, WriteContext,
};
pub use htmlguard_domain::content::{PropertyKind, Selector, ValueType};
pub use htmlguard_domain::{
    CompileError, ConfigurationDocument, ContentNode, Policy, PolicyError, PolicySpec, RuleError,
    ScopeError, SiteConfig, compile_site,
};
pub use htmlguard_settings::{
    ConfigError, DocumentFormat, GLOBAL_DEFAULT_YAML, Violation, global_default, load_document,
};
pub use htmlguard_types::{
    RejectionReport, SanitizationResult, Strategy, ValidationResult, ValidationResultBuilder,
    Workspace,
};
