use crate::registry::PolicyResolver;
use htmlguard_domain::{ContentNode, Policy};
use htmlguard_types::Strategy;
use std::borrow::Cow;
use std::sync::Arc;

/// Where a write happens: the site that owns the node and the repository workspace name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteContext<'a> {
    pub site_key: &'a str,
    pub workspace: &'a str,
}

impl<'a> WriteContext<'a> {
    pub fn new(site_key: &'a str, workspace: &'a str) -> Self {
        Self {
            site_key,
            workspace,
        }
    }
}

/// Sanitizes rich-text values on their way into the repository.
///
/// Only policies with the sanitize strategy act here. Values of properties the policy does not
/// govern, or of nodes the current user may edit unfiltered, pass through untouched.
#[derive(Debug)]
pub struct SanitizeInterceptor<'r, R: ?Sized> {
    resolver: &'r R,
}

impl<'r, R: PolicyResolver + ?Sized> SanitizeInterceptor<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    pub fn before_set_value<'v, N: ContentNode + ?Sized>(
        &self,
        ctx: &WriteContext<'_>,
        node: &N,
        property: &str,
        value: &'v str,
    ) -> Cow<'v, str> {
        match self.governing_policy(ctx, node, property) {
            Some(policy) => sanitize_value(&policy, property, value),
            None => Cow::Borrowed(value),
        }
    }

    /// Multi-valued variant. Each value is sanitized independently, order is preserved.
    pub fn before_set_values<'v, N: ContentNode + ?Sized>(
        &self,
        ctx: &WriteContext<'_>,
        node: &N,
        property: &str,
        values: &'v [String],
    ) -> Vec<Cow<'v, str>> {
        match self.governing_policy(ctx, node, property) {
            Some(policy) => values
                .iter()
                .map(|value| sanitize_value(&policy, property, value))
                .collect(),
            None => values.iter().map(|value| Cow::Borrowed(value.as_str())).collect(),
        }
    }

    fn governing_policy<N: ContentNode + ?Sized>(
        &self,
        ctx: &WriteContext<'_>,
        node: &N,
        property: &str,
    ) -> Option<Arc<Policy>> {
        self.resolver
            .resolve_policy_for_strategy(ctx.site_key, ctx.workspace, Strategy::Sanitize)
            .filter(|policy| policy.is_applicable_to(node, property))
            .filter(|policy| !policy.is_skipped_for(node))
    }
}

fn sanitize_value<'v>(policy: &Policy, property: &str, value: &'v str) -> Cow<'v, str> {
    let result = policy.sanitize(value);
    if result.sanitized_html() == value {
        return Cow::Borrowed(value);
    }
    tracing::debug!(
        property,
        rejected_tags = result.rejected_tags().len(),
        rejected_attributes = result.rejected_attributes_by_tag().len(),
        "sanitized property value"
    );
    Cow::Owned(result.sanitized_html().to_string())
}
