//! Bridge between a [`CompiledMatcher`] and the ammonia sanitizer.
//!
//! ammonia rewrites the markup; it does not say what it removed. The rejection scan parses the
//! input with the same HTML5 tree builder, walks the resulting tree, and asks the same matcher
//! the same questions, so the report and the cleaned output agree.

use crate::rules::{CLEAN_CONTENT_TAGS, CompiledMatcher};
use ammonia::{Builder, UrlRelative};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, local_name, namespace_url, ns, parse_fragment};
use htmlguard_types::RejectionReport;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%7[bB](mode|lang|workspace)%7[dD]").expect("placeholder pattern is valid")
});

/// Run ammonia with a builder derived from `matcher`.
pub(crate) fn clean(matcher: &Arc<CompiledMatcher>, html: &str) -> String {
    let tags: HashSet<&str> = matcher.allowed_tags().collect();
    let clean_content: HashSet<&str> = CLEAN_CONTENT_TAGS
        .iter()
        .copied()
        .filter(|tag| !tags.contains(tag))
        .collect();
    let tag_attributes: HashMap<&str, HashSet<&str>> = matcher
        .tag_attribute_names()
        .map(|(tag, attributes)| (tag, attributes.into_iter().collect()))
        .collect();

    let filter = Arc::clone(matcher);
    let mut builder = Builder::empty();
    builder
        .tags(tags)
        .clean_content_tags(clean_content)
        .generic_attributes(matcher.global_attribute_names().collect())
        .tag_attributes(tag_attributes)
        .url_schemes(matcher.url_schemes().collect())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None)
        .strip_comments(true)
        .attribute_filter(move |element, attribute, value| {
            if filter.attribute_allowed(element, attribute, value) {
                Some(Cow::Borrowed(value))
            } else {
                None
            }
        });
    builder.clean(html).to_string()
}

/// Parse `html` the way ammonia does: an HTML fragment in a `div` context.
pub(crate) fn parse_html_fragment(html: &str) -> RcDom {
    parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("div")),
        vec![],
    )
    .one(html)
}

/// The synthetic root element whose children are the fragment's top-level nodes. Dropping the
/// `RcDom` detaches every node, so keep `dom` alive while walking.
pub(crate) fn fragment_root(dom: &RcDom) -> Option<Handle> {
    dom.document.children.borrow().first().cloned()
}

/// Report every element and attribute of `html` that the cleaning pass discards.
///
/// Walks the parse tree ammonia cleans and follows its removal order: elements whose content is
/// dropped, or that switch namespace illegally, go with their whole subtree; other disallowed
/// elements go alone and their children move up to the nearest kept ancestor.
pub(crate) fn scan_rejections(matcher: &CompiledMatcher, html: &str) -> RejectionReport {
    let mut report = RejectionReport::new();
    let dom = parse_html_fragment(html);
    let Some(root) = fragment_root(&dom) else {
        return report;
    };
    let root_name = element_name(&root)
        .cloned()
        .unwrap_or_else(|| QualName::new(None, ns!(html), local_name!("html")));

    let mut stack: Vec<(Handle, QualName)> = Vec::new();
    push_children(&mut stack, &root, &root_name);

    while let Some((node, parent)) = stack.pop() {
        let NodeData::Element { name, attrs, .. } = &node.data else {
            continue;
        };
        let tag: &str = &name.local;
        let allowed = matcher.tag_allowed(tag);
        let drops_content = !allowed && CLEAN_CONTENT_TAGS.contains(&tag);

        if drops_content || !namespace_switch_allowed(&parent, name) {
            report.reject_tag(tag);
            continue;
        }

        if allowed {
            let rejected: Vec<String> = attrs
                .borrow()
                .iter()
                .filter(|attr| !matcher.attribute_allowed(tag, &attr.name.local, &attr.value))
                .map(|attr| attr.name.local.to_string())
                .collect();
            report.reject_attributes(tag, rejected);
            push_children(&mut stack, &node, name);
        } else {
            report.reject_tag(tag);
            push_children(&mut stack, &node, &parent);
        }
    }
    report
}

fn element_name(node: &Handle) -> Option<&QualName> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name),
        _ => None,
    }
}

fn push_children(stack: &mut Vec<(Handle, QualName)>, node: &Handle, parent: &QualName) {
    stack.extend(
        node.children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), parent.clone())),
    );
}

/// Namespace changes ammonia keeps: into SVG only through `<svg>`, into MathML only through
/// `<math>`, and back out only at an integration point.
fn namespace_switch_allowed(parent: &QualName, child: &QualName) -> bool {
    if parent.ns == ns!(html) && child.ns == ns!(svg) {
        child.local == local_name!("svg")
    } else if parent.ns == ns!(html) && child.ns == ns!(mathml) {
        child.local == local_name!("math")
    } else if parent.ns == ns!(mathml) && child.ns != ns!(mathml) {
        matches!(
            &*parent.local,
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        )
    } else if parent.ns == ns!(svg) && child.ns != ns!(svg) {
        &*parent.local == "foreignObject"
    } else {
        true
    }
}

/// Undo percent-encoding of the URL placeholders a downstream templating layer substitutes.
pub(crate) fn restore_placeholders(html: &str) -> Cow<'_, str> {
    RE_PLACEHOLDER.replace_all(html, "{$1}")
}
