use crate::model::{ConfigDocumentV1, ConfigFileV1, ElementV1, PolicySpecV1, RuleSetV1};
use htmlguard_domain::scope::{SCOPE_ENTRY_FORMAT, ScopeEntry};
use htmlguard_domain::spec::{ConfigurationDocument, ElementRule, FormatTable, PolicySpec, RuleSet};
use htmlguard_types::{Strategy, Workspace};
use std::collections::BTreeMap;
use std::fmt;

const MUST_NOT_BE_NULL: &str = "must not be null";
const MUST_NOT_BE_EMPTY: &str = "must not be empty";

/// One problem found in a configuration document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending value, e.g. `editWorkspace.allowedRuleSet.elements[2].format`.
    pub path: String,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to decode configuration: {0}")]
    Decode(String),

    #[error("invalid configuration: {}", render(.0))]
    Invalid(Vec<Violation>),
}

impl ConfigError {
    /// Every violation carried by the error. A decode failure is a single violation at the root.
    pub fn violations(&self) -> Vec<Violation> {
        match self {
            ConfigError::Decode(message) => vec![Violation::new("", message.clone())],
            ConfigError::Invalid(violations) => violations.clone(),
        }
    }
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a decoded file. Every independent field is checked; nothing short-circuits.
pub fn validate_file(file: &ConfigFileV1) -> Result<ConfigurationDocument, ConfigError> {
    match &file.html_filtering {
        Some(document) => validate_document(document),
        None => Err(ConfigError::Invalid(vec![Violation::new(
            "htmlFiltering",
            MUST_NOT_BE_NULL,
        )])),
    }
}

pub fn validate_document(document: &ConfigDocumentV1) -> Result<ConfigurationDocument, ConfigError> {
    let mut violations = Vec::new();
    let empty = BTreeMap::new();
    let definitions = document.format_definitions.as_ref().unwrap_or(&empty);

    let edit = validate_workspace(
        Workspace::Edit,
        document.edit_workspace.as_ref(),
        definitions,
        &mut violations,
    );
    let live = validate_workspace(
        Workspace::Live,
        document.live_workspace.as_ref(),
        definitions,
        &mut violations,
    );
    let formats = validate_formats(definitions, &mut violations);

    match (edit, live) {
        (Some(edit_workspace), Some(live_workspace)) if violations.is_empty() => {
            Ok(ConfigurationDocument {
                edit_workspace,
                live_workspace,
                formats,
            })
        }
        _ => Err(ConfigError::Invalid(violations)),
    }
}

fn validate_formats(
    definitions: &BTreeMap<String, String>,
    violations: &mut Vec<Violation>,
) -> FormatTable {
    let mut formats = FormatTable::new();
    for (name, pattern) in definitions {
        let path = format!("formatDefinitions.{name}");
        if pattern.trim().is_empty() {
            violations.push(Violation::new(
                path,
                format!("the value for the format definition of '{name}' must not be blank"),
            ));
        } else if formats.insert(name, pattern).is_err() {
            violations.push(Violation::new(
                path,
                format!(
                    "the value for the format definition of '{name}' must be a valid regular expression"
                ),
            ));
        }
    }
    formats
}

fn validate_workspace(
    workspace: Workspace,
    spec: Option<&PolicySpecV1>,
    definitions: &BTreeMap<String, String>,
    violations: &mut Vec<Violation>,
) -> Option<PolicySpec> {
    let path = workspace.config_key();
    let Some(spec) = spec else {
        violations.push(Violation::new(path, MUST_NOT_BE_NULL));
        return None;
    };
    let before = violations.len();

    let strategy = match spec.strategy.as_deref() {
        None => {
            violations.push(Violation::new(format!("{path}.strategy"), MUST_NOT_BE_NULL));
            None
        }
        Some(raw) => {
            let parsed = Strategy::from_name(raw.trim());
            if parsed.is_none() {
                violations.push(Violation::new(
                    format!("{path}.strategy"),
                    format!("unknown strategy: {raw} (expected 'reject' or 'sanitize')"),
                ));
            }
            parsed
        }
    };

    let process = spec.process.clone();
    match &process {
        None => violations.push(Violation::new(format!("{path}.process"), MUST_NOT_BE_NULL)),
        Some(entries) if entries.is_empty() => {
            violations.push(Violation::new(format!("{path}.process"), MUST_NOT_BE_EMPTY));
        }
        Some(entries) => validate_scope_entries(&format!("{path}.process"), entries, violations),
    }
    let skip = spec.skip.clone().unwrap_or_default();
    validate_scope_entries(&format!("{path}.skip"), &skip, violations);

    let allowed = match &spec.allowed_rule_set {
        None => {
            violations.push(Violation::new(
                format!("{path}.allowedRuleSet"),
                MUST_NOT_BE_NULL,
            ));
            None
        }
        Some(rule_set) => Some(validate_rule_set(
            &format!("{path}.allowedRuleSet"),
            rule_set,
            true,
            definitions,
            violations,
        )),
    };
    let disallowed = spec.disallowed_rule_set.as_ref().map(|rule_set| {
        validate_rule_set(
            &format!("{path}.disallowedRuleSet"),
            rule_set,
            false,
            definitions,
            violations,
        )
    });

    if violations.len() != before {
        return None;
    }
    Some(PolicySpec {
        strategy: strategy?,
        process: process?,
        skip,
        skip_on_permissions: spec.skip_on_permissions.clone().unwrap_or_default(),
        allowed: allowed?,
        disallowed,
    })
}

fn validate_scope_entries(path: &str, entries: &[String], violations: &mut Vec<Violation>) {
    for (idx, entry) in entries.iter().enumerate() {
        if ScopeEntry::parse(entry, path).is_err() {
            violations.push(Violation::new(format!("{path}[{idx}]"), SCOPE_ENTRY_FORMAT));
        }
    }
}

fn validate_rule_set(
    path: &str,
    rule_set: &RuleSetV1,
    required: bool,
    definitions: &BTreeMap<String, String>,
    violations: &mut Vec<Violation>,
) -> RuleSet {
    let elements = rule_set.elements.clone().unwrap_or_default();
    if required {
        match &rule_set.elements {
            None => violations.push(Violation::new(format!("{path}.elements"), MUST_NOT_BE_NULL)),
            Some(list) if list.is_empty() => {
                violations.push(Violation::new(format!("{path}.elements"), MUST_NOT_BE_EMPTY));
            }
            Some(_) => {}
        }
    }

    let elements = elements
        .iter()
        .enumerate()
        .map(|(idx, element)| {
            validate_element(&format!("{path}.elements[{idx}]"), element, definitions, violations)
        })
        .collect();

    RuleSet {
        protocols: rule_set.protocols.clone().unwrap_or_default(),
        elements,
    }
}

fn validate_element(
    path: &str,
    element: &ElementV1,
    definitions: &BTreeMap<String, String>,
    violations: &mut Vec<Violation>,
) -> ElementRule {
    let tags = element.tags.clone().unwrap_or_default();
    let attributes = element.attributes.clone().unwrap_or_default();

    if tags.is_empty() && attributes.is_empty() {
        violations.push(Violation::new(
            path,
            "must contain 'tags' and/or 'attributes'",
        ));
    }
    if let Some(format) = &element.format {
        if attributes.is_empty() {
            violations.push(Violation::new(
                format!("{path}.format"),
                "'format' must be used with 'attributes'",
            ));
        }
        if !definitions.contains_key(format) {
            violations.push(Violation::new(
                format!("{path}.format"),
                format!("Format '{format}' not defined under 'formatDefinitions'"),
            ));
        }
    }

    ElementRule {
        tags,
        attributes,
        format: element.format.clone(),
    }
}
