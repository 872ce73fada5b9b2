use crate::interceptor::WriteContext;
use crate::registry::PolicyResolver;
use htmlguard_domain::ContentNode;
use htmlguard_types::{Strategy, ValidationResult, ValidationResultBuilder};
use std::collections::BTreeMap;

/// Outcome of validating one node against its reject policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeValidation {
    result: ValidationResult,
    sanitized_properties: BTreeMap<String, Vec<String>>,
}

impl NodeValidation {
    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    /// What each validated property would look like after sanitization, one entry per value.
    pub fn sanitized_properties(&self) -> &BTreeMap<String, Vec<String>> {
        &self.sanitized_properties
    }

    pub fn sanitized_property(&self, property: &str) -> Option<&[String]> {
        self.sanitized_properties.get(property).map(Vec::as_slice)
    }

    /// User-facing constraint message, `None` when the node is valid.
    pub fn message(&self) -> Option<String> {
        (!self.is_valid()).then(|| self.result.describe().join("\n"))
    }
}

/// Validates node properties against policies with the reject strategy.
#[derive(Debug)]
pub struct NodeValidator<'r, R: ?Sized> {
    resolver: &'r R,
}

impl<'r, R: PolicyResolver + ?Sized> NodeValidator<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Validate every governed property in `properties`. All values of all properties feed
    /// one result, so the message lists every rejection on the node.
    pub fn validate<'a, N, I>(&self, ctx: &WriteContext<'_>, node: &N, properties: I) -> NodeValidation
    where
        N: ContentNode + ?Sized,
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let Some(policy) =
            self.resolver
                .resolve_policy_for_strategy(ctx.site_key, ctx.workspace, Strategy::Reject)
        else {
            return NodeValidation::default();
        };
        if policy.is_skipped_for(node) {
            tracing::debug!(site_key = ctx.site_key, "validation skipped on permission");
            return NodeValidation::default();
        }

        let mut builder = ValidationResultBuilder::new();
        let mut sanitized_properties = BTreeMap::new();
        for (property, values) in properties {
            if !policy.is_applicable_to(node, property) {
                continue;
            }
            let sanitized = values
                .iter()
                .map(|value| {
                    policy.validate(property, value, &mut builder);
                    policy.sanitize(value).sanitized_html().to_string()
                })
                .collect();
            sanitized_properties.insert(property.to_string(), sanitized);
        }

        let result = builder.build();
        if !result.is_valid() {
            tracing::debug!(
                site_key = ctx.site_key,
                properties = result.property_results().len(),
                "node rejected by html policy"
            );
        }
        NodeValidation {
            result,
            sanitized_properties,
        }
    }
}
