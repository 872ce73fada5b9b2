//! Typed, validated configuration model.
//!
//! Values here are produced by the settings crate after validation; the domain never sees a
//! raw document.

use htmlguard_types::{Strategy, Workspace};
use regex::Regex;
use std::collections::BTreeMap;

/// One configuration document: a policy per workspace plus the shared format table.
#[derive(Clone, Debug)]
pub struct ConfigurationDocument {
    pub edit_workspace: PolicySpec,
    pub live_workspace: PolicySpec,
    pub formats: FormatTable,
}

impl ConfigurationDocument {
    pub fn policy_spec(&self, workspace: Workspace) -> &PolicySpec {
        match workspace {
            Workspace::Edit => &self.edit_workspace,
            Workspace::Live => &self.live_workspace,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySpec {
    pub strategy: Strategy,
    pub process: Vec<String>,
    pub skip: Vec<String>,
    pub skip_on_permissions: Vec<String>,
    pub allowed: RuleSet,
    pub disallowed: Option<RuleSet>,
}

impl PolicySpec {
    pub fn new(strategy: Strategy, process: Vec<String>, allowed: RuleSet) -> Self {
        Self {
            strategy,
            process,
            skip: Vec::new(),
            skip_on_permissions: Vec::new(),
            allowed,
            disallowed: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub protocols: Vec<String>,
    pub elements: Vec<ElementRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementRule {
    pub tags: Vec<String>,
    pub attributes: Vec<String>,
    pub format: Option<String>,
}

impl ElementRule {
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn attributes<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Scope the rule's attributes to `tags`.
    pub fn on_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Named value formats, compiled to whole-value matchers.
#[derive(Clone, Debug, Default)]
pub struct FormatTable {
    patterns: BTreeMap<String, Regex>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and register it under `name`. The pattern must match the entire
    /// attribute value, not a substring of it.
    pub fn insert(&mut self, name: &str, pattern: &str) -> Result<(), regex::Error> {
        let compiled = compile_format(pattern)?;
        tracing::debug!(format = name, pattern, "compiled format definition");
        self.patterns.insert(name.to_string(), compiled);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Anchor a format pattern so it only accepts whole values.
pub fn compile_format(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
