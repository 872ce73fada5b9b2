//! Shared test utilities for the htmlguard workspace.
//!
//! Sample configuration documents in every supported encoding, and [`MemoryNode`], an
//! in-memory stand-in for a content repository node.

use htmlguard_domain::content::{ContentNode, PropertyKind, Selector, ValueType};
use std::collections::{BTreeMap, BTreeSet};

/// A site document: the edit workspace sanitizes, the live workspace rejects.
pub const SITE_YAML: &str = r#"htmlFiltering:
  formatDefinitions:
    LOWER_ID: "[a-z]+"
  editWorkspace:
    strategy: SANITIZE
    process: ["nt:base.*"]
    skip: ["jnt:code.source"]
    skipOnPermissions: ["view-full-wysiwyg-editor"]
    allowedRuleSet:
      protocols: [http, https]
      elements:
        - tags: [h1, p, a]
        - attributes: [id]
          format: LOWER_ID
        - attributes: [href]
          tags: [a]
    disallowedRuleSet:
      elements:
        - tags: [h6]
  liveWorkspace:
    strategy: reject
    process: ["jnt:text.text", "jnt:bigText"]
    allowedRuleSet:
      elements:
        - tags: [p]
"#;

/// [`SITE_YAML`] encoded as TOML.
pub const SITE_TOML: &str = r#"[htmlFiltering.formatDefinitions]
LOWER_ID = "[a-z]+"

[htmlFiltering.editWorkspace]
strategy = "SANITIZE"
process = ["nt:base.*"]
skip = ["jnt:code.source"]
skipOnPermissions = ["view-full-wysiwyg-editor"]

[htmlFiltering.editWorkspace.allowedRuleSet]
protocols = ["http", "https"]

[[htmlFiltering.editWorkspace.allowedRuleSet.elements]]
tags = ["h1", "p", "a"]

[[htmlFiltering.editWorkspace.allowedRuleSet.elements]]
attributes = ["id"]
format = "LOWER_ID"

[[htmlFiltering.editWorkspace.allowedRuleSet.elements]]
attributes = ["href"]
tags = ["a"]

[[htmlFiltering.editWorkspace.disallowedRuleSet.elements]]
tags = ["h6"]

[htmlFiltering.liveWorkspace]
strategy = "reject"
process = ["jnt:text.text", "jnt:bigText"]

[[htmlFiltering.liveWorkspace.allowedRuleSet.elements]]
tags = ["p"]
"#;

/// [`SITE_YAML`] encoded as JSON.
pub const SITE_JSON: &str = r#"{
  "htmlFiltering": {
    "formatDefinitions": { "LOWER_ID": "[a-z]+" },
    "editWorkspace": {
      "strategy": "SANITIZE",
      "process": ["nt:base.*"],
      "skip": ["jnt:code.source"],
      "skipOnPermissions": ["view-full-wysiwyg-editor"],
      "allowedRuleSet": {
        "protocols": ["http", "https"],
        "elements": [
          { "tags": ["h1", "p", "a"] },
          { "attributes": ["id"], "format": "LOWER_ID" },
          { "attributes": ["href"], "tags": ["a"] }
        ]
      },
      "disallowedRuleSet": { "elements": [{ "tags": ["h6"] }] }
    },
    "liveWorkspace": {
      "strategy": "reject",
      "process": ["jnt:text.text", "jnt:bigText"],
      "allowedRuleSet": { "elements": [{ "tags": ["p"] }] }
    }
  }
}
"#;

/// A document used as the global-custom tier in tests: both workspaces sanitize down to
/// paragraphs.
pub const GLOBAL_CUSTOM_YAML: &str = r#"htmlFiltering:
  editWorkspace:
    strategy: sanitize
    process: ["nt:base.*"]
    allowedRuleSet:
      elements:
        - tags: [p]
  liveWorkspace:
    strategy: sanitize
    process: ["nt:base.*"]
    allowedRuleSet:
      elements:
        - tags: [p]
"#;

/// A document with a violation in each workspace.
pub const INVALID_YAML: &str = r#"htmlFiltering:
  editWorkspace:
    strategy: SANITIZE
    process: ["nt:base.*"]
    allowedRuleSet:
      elements:
        - tags: [p]
        - format: MISSING
  liveWorkspace:
    process: []
    allowedRuleSet:
      elements:
        - tags: [p]
"#;

/// In-memory content node.
#[derive(Clone, Debug, Default)]
pub struct MemoryNode {
    pub site_key: String,
    types: BTreeSet<String>,
    properties: BTreeMap<String, MemoryProperty>,
    permissions: BTreeSet<String>,
}

#[derive(Clone, Debug)]
pub struct MemoryProperty {
    pub kind: PropertyKind,
    pub values: Vec<String>,
}

impl MemoryNode {
    pub fn new(site_key: &str, types: &[&str]) -> Self {
        Self {
            site_key: site_key.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Add a single-valued rich-text property.
    pub fn rich_text(self, name: &str, value: &str) -> Self {
        self.property(name, PropertyKind::RICH_TEXT, &[value])
    }

    /// Add a plain string property edited with a small-text selector.
    pub fn plain_text(self, name: &str, value: &str) -> Self {
        self.property(
            name,
            PropertyKind::new(ValueType::String, Selector::SmallText),
            &[value],
        )
    }

    pub fn property(mut self, name: &str, kind: PropertyKind, values: &[&str]) -> Self {
        self.properties.insert(
            name.to_string(),
            MemoryProperty {
                kind,
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }

    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.properties.get(name).map(|p| p.values.as_slice())
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

impl ContentNode for MemoryNode {
    fn has_type(&self, node_type: &str) -> bool {
        node_type == "nt:base" || self.types.contains(node_type)
    }

    fn property_kind(&self, property: &str) -> Option<PropertyKind> {
        self.properties.get(property).map(|p| p.kind)
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
