use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A configuration file: everything lives under the `htmlFiltering` key.
///
/// This is a *user-facing* model: it is intentionally permissive so the validator, not the
/// decoder, reports what is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFileV1 {
    #[serde(
        default,
        rename = "htmlFiltering",
        skip_serializing_if = "Option::is_none"
    )]
    pub html_filtering: Option<ConfigDocumentV1>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocumentV1 {
    /// Policy for the edit (`default`) workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_workspace: Option<PolicySpecV1>,

    /// Policy for the `live` workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_workspace: Option<PolicySpecV1>,

    /// Map of format name -> regular expression the whole attribute value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_definitions: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpecV1 {
    /// `reject` or `sanitize` (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Scope entries: `nodeType`, `nodeType.*` or `nodeType.property`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<Vec<String>>,

    /// Permissions that bypass filtering for the user holding them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_on_permissions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_rule_set: Option<RuleSetV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallowed_rule_set: Option<RuleSetV1>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSetV1 {
    /// URL schemes, e.g. `http`, `https`, `mailto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementV1>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,

    /// Name of an entry under `formatDefinitions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
