use htmlguard_settings::{
    ConfigError, DocumentFormat, load_document, parse_config_json, parse_config_toml,
    parse_config_yaml, validate_file,
};
use htmlguard_test_util::{INVALID_YAML, SITE_JSON, SITE_TOML, SITE_YAML};
use htmlguard_types::Strategy;

#[test]
fn every_encoding_decodes_to_the_same_raw_model() {
    let yaml = parse_config_yaml(SITE_YAML).expect("yaml");
    let toml = parse_config_toml(SITE_TOML).expect("toml");
    let json = parse_config_json(SITE_JSON).expect("json");
    assert_eq!(yaml, toml);
    assert_eq!(yaml, json);
}

#[test]
fn site_document_validates() {
    let document = load_document(SITE_YAML, DocumentFormat::Yaml).expect("valid");
    assert_eq!(document.edit_workspace.strategy, Strategy::Sanitize);
    assert_eq!(document.live_workspace.strategy, Strategy::Reject);
    assert_eq!(
        document.edit_workspace.skip_on_permissions,
        vec!["view-full-wysiwyg-editor"]
    );
    assert!(document.formats.contains("LOWER_ID"));
    assert!(document.edit_workspace.disallowed.is_some());
}

#[test]
fn invalid_document_lists_every_violation() {
    let file = parse_config_yaml(INVALID_YAML).expect("decodes");
    let err = validate_file(&file).unwrap_err();
    let ConfigError::Invalid(violations) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    let rendered: Vec<String> = violations.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    editWorkspace.allowedRuleSet.elements[1]: must contain 'tags' and/or 'attributes'
    editWorkspace.allowedRuleSet.elements[1].format: 'format' must be used with 'attributes'
    editWorkspace.allowedRuleSet.elements[1].format: Format 'MISSING' not defined under 'formatDefinitions'
    liveWorkspace.strategy: must not be null
    liveWorkspace.process: must not be empty
    ");
}

#[test]
fn toml_syntax_error_is_reported_as_decode_error() {
    let err = load_document("[htmlFiltering\n", DocumentFormat::Toml).unwrap_err();
    assert!(matches!(err, ConfigError::Decode(_)));
}

#[test]
fn wrong_value_type_is_reported_as_decode_error() {
    let err = load_document(
        "htmlFiltering:\n  editWorkspace:\n    process: 12\n",
        DocumentFormat::Yaml,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Decode(_)));
}
