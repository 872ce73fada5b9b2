//! Integration tests for the write interceptor and node validator.

use htmlguard_app::{NodeValidator, PolicyRegistry, SanitizeInterceptor, WriteContext};
use htmlguard_domain::content::{PropertyKind, Selector, ValueType};
use htmlguard_test_util::{GLOBAL_CUSTOM_YAML, MemoryNode, SITE_YAML};
use std::borrow::Cow;

const EDIT: WriteContext<'static> = WriteContext {
    site_key: "acme",
    workspace: "default",
};
const LIVE: WriteContext<'static> = WriteContext {
    site_key: "acme",
    workspace: "live",
};

fn registry() -> PolicyRegistry {
    let registry = PolicyRegistry::new();
    registry
        .on_configuration_changed("org.jahia.modules.htmlfiltering.site-acme.yml", Some(SITE_YAML))
        .expect("site document should install");
    registry
}

fn properties(node: &MemoryNode) -> Vec<(&str, &[String])> {
    node.property_names()
        .filter_map(|name| node.values(name).map(|values| (name, values)))
        .collect()
}

#[test]
fn interceptor_sanitizes_governed_rich_text() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "");

    let value = interceptor.before_set_value(&EDIT, &node, "text", "<h1>t</h1><h6>x</h6>");
    assert_eq!(value, "<h1>t</h1>x");
}

#[test]
fn interceptor_borrows_clean_values() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "");

    let value = interceptor.before_set_value(&EDIT, &node, "text", "<p>hello</p>");
    assert!(matches!(value, Cow::Borrowed("<p>hello</p>")));
}

#[test]
fn interceptor_leaves_skipped_property_alone() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:code"]).rich_text("source", "");

    let raw = "<script>alert(1)</script>";
    assert_eq!(interceptor.before_set_value(&EDIT, &node, "source", raw), raw);
}

#[test]
fn interceptor_honors_skip_on_permissions() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"])
        .rich_text("text", "")
        .with_permission("view-full-wysiwyg-editor");

    let raw = "<h6>free</h6>";
    assert_eq!(interceptor.before_set_value(&EDIT, &node, "text", raw), raw);
}

#[test]
fn interceptor_ignores_plain_text_properties() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"])
        .plain_text("title", "")
        .property(
            "body",
            PropertyKind::new(ValueType::String, Selector::TextArea),
            &[""],
        );

    let raw = "<h6>kept</h6>";
    assert_eq!(interceptor.before_set_value(&EDIT, &node, "title", raw), raw);
    assert_eq!(interceptor.before_set_value(&EDIT, &node, "body", raw), raw);
    assert_eq!(interceptor.before_set_value(&EDIT, &node, "missing", raw), raw);
}

#[test]
fn interceptor_does_nothing_under_reject_policy() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "");

    let raw = "<h1>stays</h1>";
    assert_eq!(interceptor.before_set_value(&LIVE, &node, "text", raw), raw);
}

#[test]
fn interceptor_sanitizes_each_value() {
    let registry = registry();
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "");
    let values = vec!["<p>a</p>".to_string(), "<h6>b</h6>".to_string()];

    let sanitized = interceptor.before_set_values(&EDIT, &node, "text", &values);
    assert_eq!(sanitized, vec!["<p>a</p>", "b"]);
}

#[test]
fn interceptor_falls_back_to_global_tier() {
    let registry = PolicyRegistry::new();
    registry
        .on_configuration_changed(
            "org.jahia.modules.htmlfiltering.global.custom.yml",
            Some(GLOBAL_CUSTOM_YAML),
        )
        .expect("global custom should install");
    let interceptor = SanitizeInterceptor::new(&registry);
    let node = MemoryNode::new("elsewhere", &["jnt:text"]).rich_text("text", "");
    let ctx = WriteContext::new("elsewhere", "live");

    assert_eq!(
        interceptor.before_set_value(&ctx, &node, "text", "<h1>t</h1><p>x</p>"),
        "t<p>x</p>"
    );
}

#[test]
fn validator_reports_rejected_tags() {
    let registry = registry();
    let validator = NodeValidator::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "<p>ok</p><h1>no</h1>");

    let validation = validator.validate(&LIVE, &node, properties(&node));

    assert!(!validation.is_valid());
    assert_eq!(
        validation.message().as_deref(),
        Some("[text] Not allowed tags: h1")
    );
    assert_eq!(
        validation.sanitized_property("text"),
        Some(&["<p>ok</p>no".to_string()][..])
    );
}

#[test]
fn validator_collects_every_value_of_a_property() {
    let registry = registry();
    let validator = NodeValidator::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:bigText"]).property(
        "text",
        PropertyKind::RICH_TEXT,
        &["<p>a</p>", "<p onclick=\"x()\">b</p>", "<h2>c</h2>"],
    );

    let validation = validator.validate(&LIVE, &node, properties(&node));

    let report = validation.result().property_result("text").expect("report");
    assert!(report.rejected_tags.contains("h2"));
    assert!(report.rejected_attributes_by_tag["p"].contains("onclick"));
    assert_eq!(
        validation.message().as_deref(),
        Some("[text] Not allowed tags: h2\n[text] Not allowed attributes: p: onclick")
    );
    assert_eq!(
        validation.sanitized_property("text"),
        Some(&["<p>a</p>".to_string(), "<p>b</p>".to_string(), "c".to_string()][..])
    );
}

#[test]
fn validator_accepts_out_of_scope_nodes() {
    let registry = registry();
    let validator = NodeValidator::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:other"]).rich_text("text", "<h1>free</h1>");

    let validation = validator.validate(&LIVE, &node, properties(&node));

    assert!(validation.is_valid());
    assert_eq!(validation.message(), None);
    assert!(validation.sanitized_properties().is_empty());
}

#[test]
fn validator_ignores_sanitize_policies() {
    let registry = registry();
    let validator = NodeValidator::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "<h6>x</h6>");

    assert!(validator.validate(&EDIT, &node, properties(&node)).is_valid());
}

#[test]
fn validator_without_any_policy_accepts() {
    let registry = PolicyRegistry::new();
    let validator = NodeValidator::new(&registry);
    let node = MemoryNode::new("acme", &["jnt:text"]).rich_text("text", "<script>x</script>");

    assert!(validator.validate(&LIVE, &node, properties(&node)).is_valid());
}
