use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tags and attributes a policy discarded from one piece of markup.
///
/// Repeated occurrences of the same tag are merged, so the report describes *what* was
/// rejected rather than *how often*.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RejectionReport {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub rejected_tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rejected_attributes_by_tag: BTreeMap<String, BTreeSet<String>>,
}

impl RejectionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_tag(&mut self, tag: impl Into<String>) {
        self.rejected_tags.insert(tag.into());
    }

    /// Record attributes discarded from `tag`. An empty attribute list records nothing.
    pub fn reject_attributes<I, S>(&mut self, tag: &str, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut attributes = attributes.into_iter().map(Into::into).peekable();
        if attributes.peek().is_none() {
            return;
        }
        self.rejected_attributes_by_tag
            .entry(tag.to_string())
            .or_default()
            .extend(attributes);
    }

    pub fn merge(&mut self, other: RejectionReport) {
        self.rejected_tags.extend(other.rejected_tags);
        for (tag, attributes) in other.rejected_attributes_by_tag {
            self.reject_attributes(&tag, attributes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rejected_tags.is_empty() && self.rejected_attributes_by_tag.is_empty()
    }
}

/// Outcome of sanitizing one value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SanitizationResult {
    pub sanitized_html: String,
    #[serde(flatten)]
    pub report: RejectionReport,
}

impl SanitizationResult {
    pub fn new(sanitized_html: String, report: RejectionReport) -> Self {
        Self {
            sanitized_html,
            report,
        }
    }

    /// True when nothing had to be removed from the input.
    pub fn is_safe(&self) -> bool {
        self.report.is_empty()
    }

    pub fn sanitized_html(&self) -> &str {
        &self.sanitized_html
    }

    pub fn rejected_tags(&self) -> &BTreeSet<String> {
        &self.report.rejected_tags
    }

    pub fn rejected_attributes_by_tag(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.report.rejected_attributes_by_tag
    }

    pub fn into_report(self) -> RejectionReport {
        self.report
    }
}

/// Validation outcome across the properties of one node.
///
/// Only properties with at least one rejection are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, RejectionReport>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn property_results(&self) -> &BTreeMap<String, RejectionReport> {
        &self.properties
    }

    pub fn property_result(&self, property: &str) -> Option<&RejectionReport> {
        self.properties.get(property)
    }

    /// Rejected tags across every property.
    pub fn rejected_tags(&self) -> BTreeSet<String> {
        self.properties
            .values()
            .flat_map(|r| r.rejected_tags.iter().cloned())
            .collect()
    }

    /// Rejected attributes across every property, merged per tag.
    pub fn rejected_attributes_by_tag(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for report in self.properties.values() {
            for (tag, attributes) in &report.rejected_attributes_by_tag {
                merged
                    .entry(tag.clone())
                    .or_default()
                    .extend(attributes.iter().cloned());
            }
        }
        merged
    }

    /// One human-readable line per property, e.g.
    /// `[text] Not allowed tags: h6, script` followed by
    /// `[text] Not allowed attributes: a: href, onclick; p: style`.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (property, report) in &self.properties {
            if !report.rejected_tags.is_empty() {
                let tags: Vec<&str> = report.rejected_tags.iter().map(String::as_str).collect();
                lines.push(format!("[{property}] Not allowed tags: {}", tags.join(", ")));
            }
            if !report.rejected_attributes_by_tag.is_empty() {
                let summary: Vec<String> = report
                    .rejected_attributes_by_tag
                    .iter()
                    .map(|(tag, attributes)| {
                        let attributes: Vec<&str> = attributes.iter().map(String::as_str).collect();
                        format!("{tag}: {}", attributes.join(", "))
                    })
                    .collect();
                lines.push(format!(
                    "[{property}] Not allowed attributes: {}",
                    summary.join("; ")
                ));
            }
        }
        lines
    }
}

/// Accumulates rejections for several properties (and several values per property).
#[derive(Clone, Debug, Default)]
pub struct ValidationResultBuilder {
    properties: BTreeMap<String, RejectionReport>,
}

impl ValidationResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_tag(&mut self, property: &str, tag: &str) -> &mut Self {
        self.entry(property).reject_tag(tag);
        self
    }

    pub fn reject_attributes<I, S>(&mut self, property: &str, tag: &str, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry(property).reject_attributes(tag, attributes);
        self
    }

    /// Merge a whole report into `property`.
    pub fn record(&mut self, property: &str, report: RejectionReport) -> &mut Self {
        if !report.is_empty() {
            self.entry(property).merge(report);
        }
        self
    }

    pub fn build(self) -> ValidationResult {
        let properties = self
            .properties
            .into_iter()
            .filter(|(_, report)| !report.is_empty())
            .collect();
        ValidationResult { properties }
    }

    fn entry(&mut self, property: &str) -> &mut RejectionReport {
        self.properties.entry(property.to_string()).or_default()
    }
}
