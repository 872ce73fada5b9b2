use crate::content::{ContentNode, PropertyKind};
use crate::policy::Policy;
use crate::spec::{ElementRule, FormatTable, PolicySpec, RuleSet};
use htmlguard_types::Strategy;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
pub struct TestNode {
    pub types: BTreeSet<String>,
    pub kinds: BTreeMap<String, PropertyKind>,
    pub permissions: BTreeSet<String>,
}

impl TestNode {
    pub fn with_property(mut self, name: &str, kind: PropertyKind) -> Self {
        self.kinds.insert(name.to_string(), kind);
        self
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.insert(permission.to_string());
        self
    }
}

impl ContentNode for TestNode {
    fn has_type(&self, node_type: &str) -> bool {
        self.types.contains(node_type)
    }

    fn property_kind(&self, property: &str) -> Option<PropertyKind> {
        self.kinds.get(property).copied()
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

pub fn node(types: &[&str]) -> TestNode {
    TestNode {
        types: types.iter().map(|t| t.to_string()).collect(),
        ..TestNode::default()
    }
}

pub fn formats(entries: &[(&str, &str)]) -> FormatTable {
    let mut table = FormatTable::new();
    for (name, pattern) in entries {
        table.insert(name, pattern).expect("valid test pattern");
    }
    table
}

pub fn spec_with(allowed: Vec<ElementRule>, disallowed: Option<RuleSet>) -> PolicySpec {
    PolicySpec {
        disallowed,
        ..PolicySpec::new(
            Strategy::Sanitize,
            vec!["nt:base".to_string()],
            RuleSet {
                protocols: vec!["http".to_string(), "https".to_string()],
                elements: allowed,
            },
        )
    }
}

pub fn policy(allowed: Vec<ElementRule>) -> Policy {
    Policy::compile(&FormatTable::new(), &spec_with(allowed, None)).expect("compile policy")
}
