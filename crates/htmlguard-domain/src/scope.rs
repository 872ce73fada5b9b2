//! Compilation of `process`/`skip` declarations into node-type → property maps.

use crate::content::ContentNode;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Accepted shapes of a `process`/`skip` item.
pub const SCOPE_ENTRY_FORMAT: &str =
    "must be in format 'nodeType', 'nodeType.*', or 'nodeType.property'";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("Each item in '{section}' must be set and not empty")]
    Blank { section: String },

    #[error("Invalid item '{entry}' in '{section}': {expected}", expected = SCOPE_ENTRY_FORMAT)]
    Malformed { entry: String, section: String },
}

/// One parsed `process`/`skip` item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeEntry {
    /// `nodeType` or `nodeType.*`
    AllProperties { node_type: String },
    /// `nodeType.property`
    Property { node_type: String, property: String },
}

impl ScopeEntry {
    /// Parse a raw entry. Surrounding whitespace is ignored, around the entry and around each
    /// segment.
    pub fn parse(raw: &str, section: &str) -> Result<Self, ScopeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScopeError::Blank {
                section: section.to_string(),
            });
        }

        let segments: Vec<&str> = trimmed.split('.').map(str::trim).collect();
        let entry = match segments.as_slice() {
            [node_type] if is_name(node_type) => ScopeEntry::AllProperties {
                node_type: node_type.to_string(),
            },
            [node_type, "*"] if is_name(node_type) => ScopeEntry::AllProperties {
                node_type: node_type.to_string(),
            },
            [node_type, property] if is_name(node_type) && is_name(property) => {
                ScopeEntry::Property {
                    node_type: node_type.to_string(),
                    property: property.to_string(),
                }
            }
            _ => {
                return Err(ScopeError::Malformed {
                    entry: raw.to_string(),
                    section: section.to_string(),
                });
            }
        };
        Ok(entry)
    }

    pub fn node_type(&self) -> &str {
        match self {
            ScopeEntry::AllProperties { node_type } | ScopeEntry::Property { node_type, .. } => {
                node_type
            }
        }
    }
}

fn is_name(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
}

/// What a scope map covers for one node type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeTarget {
    AllProperties,
    Properties(BTreeSet<String>),
}

impl ScopeTarget {
    pub fn covers(&self, property: &str) -> bool {
        match self {
            ScopeTarget::AllProperties => true,
            ScopeTarget::Properties(properties) => properties.contains(property),
        }
    }
}

/// Node type → covered properties. A wildcard for a type absorbs every property entry for
/// that type, whatever order the entries were declared in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledScopeMap {
    entries: BTreeMap<String, ScopeTarget>,
}

impl CompiledScopeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every entry of one section. The first malformed entry aborts compilation.
    pub fn compile<S: AsRef<str>>(entries: &[S], section: &str) -> Result<Self, ScopeError> {
        let mut map = Self::new();
        for raw in entries {
            let entry = ScopeEntry::parse(raw.as_ref(), section)?;
            map.add(entry, section);
        }
        Ok(map)
    }

    pub fn add(&mut self, entry: ScopeEntry, section: &str) {
        match entry {
            ScopeEntry::AllProperties { node_type } => {
                let previous = self
                    .entries
                    .insert(node_type.clone(), ScopeTarget::AllProperties);
                if let Some(ScopeTarget::Properties(discarded)) = previous {
                    tracing::warn!(
                        section,
                        node_type = %node_type,
                        discarded = ?discarded,
                        "wildcard entry replaces previously declared properties"
                    );
                }
            }
            ScopeEntry::Property {
                node_type,
                property,
            } => match self.entries.get_mut(&node_type) {
                Some(ScopeTarget::AllProperties) => {
                    tracing::warn!(
                        section,
                        node_type = %node_type,
                        property = %property,
                        "property entry ignored, node type already covers all properties"
                    );
                }
                Some(ScopeTarget::Properties(properties)) => {
                    properties.insert(property);
                }
                None => {
                    self.entries.insert(
                        node_type,
                        ScopeTarget::Properties(BTreeSet::from([property])),
                    );
                }
            },
        }
    }

    pub fn get(&self, node_type: &str) -> Option<&ScopeTarget> {
        self.entries.get(node_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScopeTarget)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when some declared type of `node` covers `property`.
    pub fn is_in_scope<N: ContentNode + ?Sized>(&self, node: &N, property: &str) -> bool {
        self.entries
            .iter()
            .any(|(node_type, target)| node.has_type(node_type) && target.covers(property))
    }

    /// Same as [`is_in_scope`](Self::is_in_scope) for an explicit list of resolved types.
    pub fn matches_types<'a, I>(&self, node_types: I, property: &str) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        node_types.into_iter().any(|node_type| {
            self.entries
                .get(node_type)
                .is_some_and(|target| target.covers(property))
        })
    }
}

impl fmt::Display for CompiledScopeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (node_type, target) in &self.entries {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            match target {
                ScopeTarget::AllProperties => write!(f, "{node_type}.*")?,
                ScopeTarget::Properties(properties) => {
                    let joined: Vec<&str> = properties.iter().map(String::as_str).collect();
                    write!(f, "{node_type}.{{{}}}", joined.join(","))?;
                }
            }
        }
        Ok(())
    }
}
