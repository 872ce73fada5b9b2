//! Compilation of allow/disallow rule sets into an executable matcher.

use crate::spec::{ElementRule, FormatTable, PolicySpec, RuleSet};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("{path}: must contain 'tags' and/or 'attributes'")]
    MissingTagsAndAttributes { path: String },

    #[error("{path}: 'format' must be used with 'attributes'")]
    FormatWithoutAttributes { path: String },

    #[error("{path}: Format '{format}' not defined under 'formatDefinitions'")]
    UndefinedFormat { path: String, format: String },
}

/// Tags whose content is dropped together with the tag when they are not allowed.
pub const CLEAN_CONTENT_TAGS: [&str; 2] = ["script", "style"];

/// Attributes carrying a URL, checked against the protocol lists.
pub fn is_url_attribute(tag: &str, attribute: &str) -> bool {
    matches!(attribute, "href" | "src")
        || matches!(
            (tag, attribute),
            ("form", "action")
                | ("object", "data")
                | ("button", "formaction")
                | ("input", "formaction")
                | ("a", "ping")
                | ("video", "poster")
        )
}

/// Value constraints registered for one attribute name. An unconstrained entry accepts any
/// value; otherwise the value must match at least one registered format.
#[derive(Clone, Debug, Default)]
struct ValueConstraints {
    any_value: bool,
    formats: Vec<Regex>,
}

impl ValueConstraints {
    fn add(&mut self, format: Option<&Regex>) {
        match format {
            Some(re) => self.formats.push(re.clone()),
            None => self.any_value = true,
        }
    }

    fn matches(&self, value: &str) -> bool {
        self.any_value || self.formats.iter().any(|re| re.is_match(value))
    }
}

#[derive(Clone, Debug, Default)]
struct AttributeTable {
    global: BTreeMap<String, ValueConstraints>,
    by_tag: BTreeMap<String, BTreeMap<String, ValueConstraints>>,
}

impl AttributeTable {
    fn register(&mut self, tags: &[String], attributes: &[String], format: Option<&Regex>) {
        for attribute in attributes {
            let attribute = attribute.to_ascii_lowercase();
            if tags.is_empty() {
                self.global.entry(attribute).or_default().add(format);
            } else {
                for tag in tags {
                    self.by_tag
                        .entry(tag.to_ascii_lowercase())
                        .or_default()
                        .entry(attribute.clone())
                        .or_default()
                        .add(format);
                }
            }
        }
    }

    fn matches(&self, tag: &str, attribute: &str, value: &str) -> bool {
        let scoped = self
            .by_tag
            .get(tag)
            .and_then(|attributes| attributes.get(attribute))
            .is_some_and(|c| c.matches(value));
        scoped || self.global.get(attribute).is_some_and(|c| c.matches(value))
    }
}

#[derive(Clone, Debug, Default)]
struct RuleTable {
    tags: BTreeSet<String>,
    attributes: AttributeTable,
    protocols: BTreeSet<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Allow,
    Disallow,
}

impl Mode {
    fn section(self) -> &'static str {
        match self {
            Mode::Allow => "allowedRuleSet",
            Mode::Disallow => "disallowedRuleSet",
        }
    }
}

/// Executable form of a policy's allow and disallow rules.
///
/// Names are compared lowercase. Disallow entries always override allow entries.
#[derive(Clone, Debug, Default)]
pub struct CompiledMatcher {
    allowed: RuleTable,
    denied: RuleTable,
}

/// Compile the rule sets of `spec`, resolving `format` references against `formats`.
pub fn compile(formats: &FormatTable, spec: &PolicySpec) -> Result<CompiledMatcher, RuleError> {
    let mut matcher = CompiledMatcher::default();
    register_rule_set(&mut matcher.allowed, formats, &spec.allowed, Mode::Allow)?;
    if let Some(disallowed) = &spec.disallowed {
        register_rule_set(&mut matcher.denied, formats, disallowed, Mode::Disallow)?;
    }
    Ok(matcher)
}

fn register_rule_set(
    table: &mut RuleTable,
    formats: &FormatTable,
    rule_set: &RuleSet,
    mode: Mode,
) -> Result<(), RuleError> {
    for (idx, element) in rule_set.elements.iter().enumerate() {
        let path = format!("{}.elements[{idx}]", mode.section());
        register_element(table, formats, element, &path)?;
    }
    table.protocols.extend(
        rule_set
            .protocols
            .iter()
            .map(|p| p.trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty()),
    );
    Ok(())
}

fn register_element(
    table: &mut RuleTable,
    formats: &FormatTable,
    element: &ElementRule,
    path: &str,
) -> Result<(), RuleError> {
    if element.tags.is_empty() && element.attributes.is_empty() {
        return Err(RuleError::MissingTagsAndAttributes {
            path: path.to_string(),
        });
    }
    if element.attributes.is_empty() {
        if element.format.is_some() {
            return Err(RuleError::FormatWithoutAttributes {
                path: path.to_string(),
            });
        }
        table
            .tags
            .extend(element.tags.iter().map(|t| t.to_ascii_lowercase()));
        return Ok(());
    }

    let format = match element.format.as_deref() {
        Some(name) => Some(formats.get(name).ok_or_else(|| RuleError::UndefinedFormat {
            path: format!("{path}.format"),
            format: name.to_string(),
        })?),
        None => None,
    };
    table
        .attributes
        .register(&element.tags, &element.attributes, format);
    Ok(())
}

impl CompiledMatcher {
    pub fn tag_allowed(&self, tag: &str) -> bool {
        self.allowed.tags.contains(tag) && !self.denied.tags.contains(tag)
    }

    /// Decide whether `attribute="value"` survives on `tag`. The tag itself is assumed to be
    /// allowed.
    pub fn attribute_allowed(&self, tag: &str, attribute: &str, value: &str) -> bool {
        if !self.allowed.attributes.matches(tag, attribute, value) {
            return false;
        }
        if self.denied.attributes.matches(tag, attribute, value) {
            return false;
        }
        !is_url_attribute(tag, attribute) || self.url_allowed(value)
    }

    pub fn protocol_allowed(&self, scheme: &str) -> bool {
        let scheme = scheme.to_ascii_lowercase();
        self.allowed.protocols.contains(&scheme) && !self.denied.protocols.contains(&scheme)
    }

    /// Relative URLs are always acceptable; absolute ones need an allowed scheme.
    pub fn url_allowed(&self, value: &str) -> bool {
        match Url::parse(value) {
            Ok(url) => self.protocol_allowed(url.scheme()),
            Err(url::ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        }
    }

    /// Tags that survive sanitization.
    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed
            .tags
            .iter()
            .filter(|t| !self.denied.tags.contains(*t))
            .map(String::as_str)
    }

    /// Attribute names allowed on every tag.
    pub fn global_attribute_names(&self) -> impl Iterator<Item = &str> {
        self.allowed.attributes.global.keys().map(String::as_str)
    }

    /// Attribute names allowed on specific tags.
    pub fn tag_attribute_names(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.allowed.attributes.by_tag.iter().map(|(tag, attributes)| {
            (
                tag.as_str(),
                attributes.keys().map(String::as_str).collect(),
            )
        })
    }

    /// URL schemes accepted in URL-valued attributes.
    pub fn url_schemes(&self) -> impl Iterator<Item = &str> {
        self.allowed
            .protocols
            .iter()
            .filter(|p| !self.denied.protocols.contains(*p))
            .map(String::as_str)
    }
}
