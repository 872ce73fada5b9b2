use crate::content::{ContentNode, PropertyKind};
use crate::rules::{self, CompiledMatcher, RuleError};
use crate::sanitize;
use crate::scope::{CompiledScopeMap, ScopeError};
use crate::spec::{FormatTable, PolicySpec};
use htmlguard_types::{SanitizationResult, Strategy, ValidationResultBuilder};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// A compiled, immutable policy for one workspace of one site.
///
/// Nothing is mutated after [`Policy::compile`]; share it freely behind an `Arc`.
#[derive(Clone, Debug)]
pub struct Policy {
    strategy: Strategy,
    process: CompiledScopeMap,
    skip: CompiledScopeMap,
    skip_on_permissions: Vec<String>,
    matcher: Arc<CompiledMatcher>,
}

impl Policy {
    pub fn compile(formats: &FormatTable, spec: &PolicySpec) -> Result<Self, PolicyError> {
        let process = CompiledScopeMap::compile(spec.process.as_slice(), "process")?;
        let skip = CompiledScopeMap::compile(spec.skip.as_slice(), "skip")?;
        let matcher = rules::compile(formats, spec)?;
        Ok(Self {
            strategy: spec.strategy,
            process,
            skip,
            skip_on_permissions: spec.skip_on_permissions.clone(),
            matcher: Arc::new(matcher),
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn process_scope(&self) -> &CompiledScopeMap {
        &self.process
    }

    pub fn skip_scope(&self) -> &CompiledScopeMap {
        &self.skip
    }

    pub fn matcher(&self) -> &CompiledMatcher {
        &self.matcher
    }

    /// A property is governed when it is rich text, in the process scope and not in the skip
    /// scope. Skip wins over process.
    pub fn is_applicable<N: ContentNode + ?Sized>(
        &self,
        node: &N,
        property: &str,
        kind: PropertyKind,
    ) -> bool {
        kind.is_rich_text()
            && self.process.is_in_scope(node, property)
            && !self.skip.is_in_scope(node, property)
    }

    /// [`is_applicable`](Self::is_applicable) with the kind looked up on the node. Properties
    /// without a definition are never governed.
    pub fn is_applicable_to<N: ContentNode + ?Sized>(&self, node: &N, property: &str) -> bool {
        node.property_kind(property)
            .is_some_and(|kind| self.is_applicable(node, property, kind))
    }

    /// [`is_applicable`](Self::is_applicable) for an already resolved list of node types.
    pub fn is_applicable_for_types(
        &self,
        node_types: &[&str],
        property: &str,
        kind: PropertyKind,
    ) -> bool {
        kind.is_rich_text()
            && self.process.matches_types(node_types.iter().copied(), property)
            && !self.skip.matches_types(node_types.iter().copied(), property)
    }

    /// True when the acting principal holds one of the bypass permissions on `node`.
    pub fn is_skipped_for<N: ContentNode + ?Sized>(&self, node: &N) -> bool {
        self.skip_on_permissions
            .iter()
            .any(|permission| node.has_permission(permission))
    }

    pub fn sanitize(&self, html: &str) -> SanitizationResult {
        let report = sanitize::scan_rejections(&self.matcher, html);
        let cleaned = sanitize::clean(&self.matcher, html);
        let sanitized = sanitize::restore_placeholders(&cleaned).into_owned();
        SanitizationResult::new(sanitized, report)
    }

    /// Record what [`sanitize`](Self::sanitize) would discard from `html` against `property`.
    pub fn validate(&self, property: &str, html: &str, results: &mut ValidationResultBuilder) {
        let report = sanitize::scan_rejections(&self.matcher, html);
        results.record(property, report);
    }
}
