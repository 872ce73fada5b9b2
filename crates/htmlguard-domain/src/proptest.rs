//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Sanitization idempotence
//! - Validation agreeing with what sanitization removes, on parser edge cases
//! - Scope compilation independent of declaration order

use crate::content::PropertyKind;
use crate::policy::Policy;
use crate::rules;
use crate::sanitize;
use crate::scope::{CompiledScopeMap, ScopeTarget};
use crate::spec::{ElementRule, PolicySpec};
use crate::test_support::{formats, node, spec_with};
use ammonia::{Builder, UrlRelative};
use htmlguard_types::ValidationResultBuilder;
use markup5ever_rcdom::{Handle, NodeData};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ]{0,8}").unwrap()
}

fn arb_attribute() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("id"), Just("class"), Just("style"), Just("title")],
        prop::string::string_regex("[a-zA-Z0-9]{1,6}").unwrap(),
    )
        .prop_map(|(name, value)| format!(r#" {name}="{value}""#))
}

/// Well-nested inline markup: allowed and stripped phrasing tags, with attributes.
fn arb_inline() -> impl Strategy<Value = String> {
    let leaf = arb_text();
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop_oneof![
                Just("b"),
                Just("em"),
                Just("strong"),
                Just("i"),
                Just("span"),
                Just("u")
            ],
            prop::collection::vec(arb_attribute(), 0..3),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, attributes, children)| {
                format!("<{tag}{}>{}</{tag}>", attributes.concat(), children.concat())
            })
    })
}

fn arb_fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            arb_inline(),
            arb_inline().prop_map(|inner| format!("<p>{inner}</p>")),
            arb_text().prop_map(|text| format!("<script>{text}</script>")),
            arb_text().prop_map(|text| format!("<!--{text}-->")),
        ],
        0..5,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_url() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("x.png"),
        Just("/a?b=1"),
        Just("https://example.com/"),
        Just("javascript&colon;alert(1)"),
        Just("&#106;avascript:alert(1)"),
        Just("java&Tab;script:alert(1)"),
        Just("javascript&#x3A;alert(1)"),
        Just("mailto:a@b.c"),
        Just("JaVaScRiPt:x"),
    ]
}

/// Inputs where a naive tokenizer and the HTML5 tree builder part ways.
fn arb_adversarial_part() -> impl Strategy<Value = String> {
    let raw_text = prop_oneof![
        Just("script"),
        Just("style"),
        Just("textarea"),
        Just("title"),
        Just("iframe"),
        Just("noscript"),
        Just("noframes"),
        Just("xmp"),
    ];
    prop_oneof![
        Just("<!-->".to_string()),
        Just("<!--->".to_string()),
        Just("<!---->".to_string()),
        Just("<!-- open".to_string()),
        arb_text().prop_map(|text| format!("<!--{text}-->")),
        arb_url().prop_map(|url| format!(r#"<a href="{url}">x</a>"#)),
        arb_url().prop_map(|url| format!("<a href={url}>x</a>")),
        arb_url().prop_map(|url| format!(r#"<img src="{url}">"#)),
        raw_text.prop_map(|tag| format!("<{tag}><p onclick=x>y</p></{tag}>")),
        Just("<plaintext><p onclick=x>y".to_string()),
        Just(r#"<p title="unterminated>x</p>"#.to_string()),
        Just("<p title='a>b".to_string()),
        Just("<P ID=abc>x</P>".to_string()),
        Just("<p id=ABC>x</p>".to_string()),
        Just(r#"<img src="x.png" onerror="alert(1)">"#.to_string()),
        arb_inline(),
    ]
}

fn arb_adversarial_fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_adversarial_part(), 1..5).prop_map(|parts| parts.concat())
}

fn arb_scope_entries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (
            prop_oneof![Just("a"), Just("b"), Just("c")],
            prop_oneof![Just(""), Just(".*"), Just(".x"), Just(".y")],
        )
            .prop_map(|(node_type, suffix)| format!("{node_type}{suffix}")),
        0..10,
    )
}

fn sample_policy() -> Policy {
    let spec = spec_with(
        vec![
            ElementRule::tags(["p", "b", "em", "strong"]),
            ElementRule::attributes(["class"]),
            ElementRule::attributes(["id"]).with_format("LOWER"),
        ],
        None,
    );
    Policy::compile(&formats(&[("LOWER", "[a-z]+")]), &spec).expect("compile")
}

fn adversarial_spec() -> PolicySpec {
    spec_with(
        vec![
            ElementRule::tags(["p", "a", "img", "b", "em"]),
            ElementRule::attributes(["href"]).on_tags(["a"]),
            ElementRule::attributes(["src"]).on_tags(["img"]),
            ElementRule::attributes(["class"]),
            ElementRule::attributes(["id"]).with_format("LOWER"),
        ],
        None,
    )
}

fn collect_names(node: &Handle, tags: &mut HashSet<String>, attributes: &mut HashSet<String>) {
    if let NodeData::Element { name, attrs, .. } = &node.data {
        tags.insert(name.local.to_string());
        attributes.extend(attrs.borrow().iter().map(|a| a.name.local.to_string()));
    }
    for child in node.children.borrow().iter() {
        collect_names(child, tags, attributes);
    }
}

/// Clean `html` with every tag and attribute it contains allowed.
///
/// Whatever this output loses relative to the policy's own clean is
/// exactly what the policy removed.
fn permissive_clean(html: &str) -> String {
    let dom = sanitize::parse_html_fragment(html);
    let mut tags = HashSet::new();
    let mut attributes = HashSet::new();
    if let Some(root) = sanitize::fragment_root(&dom) {
        collect_names(&root, &mut tags, &mut attributes);
    }

    let mut builder = Builder::empty();
    builder
        .tags(tags.iter().map(String::as_str).collect())
        .clean_content_tags(HashSet::new())
        .generic_attributes(attributes.iter().map(String::as_str).collect())
        .url_schemes(["http", "https", "mailto", "javascript"].into())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None)
        .strip_comments(true);
    builder.clean(html).to_string()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn sanitize_is_idempotent(html in arb_fragment()) {
        let policy = sample_policy();
        let once = policy.sanitize(&html);
        let twice = policy.sanitize(once.sanitized_html());
        prop_assert_eq!(twice.sanitized_html(), once.sanitized_html());
    }

    #[test]
    fn sanitized_output_has_nothing_left_to_reject(html in arb_fragment()) {
        let policy = sample_policy();
        let once = policy.sanitize(&html);
        let again = policy.sanitize(once.sanitized_html());
        prop_assert!(again.is_safe(), "left over: {:?}", again.report);
    }

    #[test]
    fn validate_passes_exactly_when_nothing_is_removed(html in arb_adversarial_fragment()) {
        let table = formats(&[("LOWER", "[a-z]+")]);
        let policy = Policy::compile(&table, &adversarial_spec()).expect("compile");
        let matcher = Arc::new(rules::compile(&table, &adversarial_spec()).expect("compile"));
        let untouched = sanitize::clean(&matcher, &html) == permissive_clean(&html);

        let mut builder = ValidationResultBuilder::new();
        policy.validate("text", &html, &mut builder);
        let validation = builder.build();
        prop_assert_eq!(validation.is_valid(), untouched, "input: {}", html);

        let sanitized = policy.sanitize(&html);
        prop_assert_eq!(sanitized.is_safe(), untouched, "input: {}", html);
        if let Some(report) = validation.property_result("text") {
            prop_assert_eq!(report, &sanitized.into_report());
        }
    }

    #[test]
    fn scope_map_ignores_declaration_order(
        (entries, shuffled) in arb_scope_entries()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let forward = CompiledScopeMap::compile(entries.as_slice(), "process").unwrap();
        let reordered = CompiledScopeMap::compile(shuffled.as_slice(), "process").unwrap();
        prop_assert_eq!(forward, reordered);
    }

    #[test]
    fn wildcard_is_absorbing(entries in arb_scope_entries()) {
        let mut with_wildcard = entries.clone();
        with_wildcard.push("a.*".to_string());
        let map = CompiledScopeMap::compile(with_wildcard.as_slice(), "process").unwrap();
        prop_assert_eq!(map.get("a"), Some(&ScopeTarget::AllProperties));
    }

    #[test]
    fn skip_always_wins(property in prop_oneof![Just("x"), Just("y"), Just("z")]) {
        let mut spec = spec_with(vec![ElementRule::tags(["p"])], None);
        spec.process = vec!["a.*".to_string()];
        spec.skip = vec![format!("a.{property}")];
        let policy = Policy::compile(&formats(&[]), &spec).unwrap();
        prop_assert!(!policy.is_applicable(&node(&["a"]), property, PropertyKind::RICH_TEXT));
    }
}
