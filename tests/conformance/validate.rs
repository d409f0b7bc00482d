use stateset::parse::parse;
use stateset::validate::validate;

use super::common::sample_yaml;

fn assert_has_error(input: &str, rule: &str) {
    let doc = parse(input).expect("parse should succeed");
    let result = validate(&doc);
    assert!(
        result.errors.iter().any(|e| e.rule == rule),
        "expected error {}, got: {:?}",
        rule,
        result.errors
    );
}

fn assert_has_warning(input: &str, code: &str) {
    let doc = parse(input).expect("parse should succeed");
    let result = validate(&doc);
    assert!(
        result.warnings.iter().any(|w| w.code == code),
        "expected warning {}, got: {:?}",
        code,
        result.warnings
    );
}

#[test]
fn well_formed_document_is_valid() {
    let doc = parse(sample_yaml()).unwrap();
    let result = validate(&doc);
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn s001_wrong_version() {
    assert_has_error("stateset: \"0.2\"\n", "S-001");
}

#[test]
fn s002_empty_collection() {
    assert_has_error(
        "stateset: \"0.1\"\ncollections:\n  - id: c\n    states: []\n",
        "S-002",
    );
}

#[test]
fn s003_default_not_last() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Default
      - name: Crouch
"#,
        "S-003",
    );
}

#[test]
fn s003_missing_default() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
      - name: Run
"#,
        "S-003",
    );
}

#[test]
fn s004_empty_state_name() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: ""
      - name: Default
"#,
        "S-004",
    );
}

#[test]
fn s005_duplicate_sibling_names() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        preset: { object: Movement }
      - name: Crouch
        preset: { object: Movement }
      - name: Default
"#,
        "S-005",
    );
}

#[test]
fn s005_same_name_different_target_is_fine() {
    let doc = parse(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        preset: { object: Movement }
      - name: Crouch
        preset: { object: Camera }
      - name: Default
"#,
    )
    .unwrap();
    assert!(validate(&doc).is_valid());
}

#[test]
fn s006_malformed_object_type_path() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        preset: { object: "not a type!" }
      - name: Default
"#,
        "S-006",
    );
}

#[test]
fn s007_duplicate_property_entries() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        preset:
          object: Movement
          values:
            - { type: f32, property: height, value: 0.9 }
            - { type: f32, property: height, value: 1.0 }
      - name: Default
"#,
        "S-007",
    );
}

#[test]
fn s008_blocking_default_is_an_error() {
    assert_has_error(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        blocks: [Default]
      - name: Default
"#,
        "S-008",
    );
}

#[test]
fn w001_dangling_block_reference() {
    assert_has_warning(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        blocks: [Sprint]
      - name: Default
"#,
        "W-001",
    );
}

#[test]
fn w002_self_blocking() {
    assert_has_warning(
        r#"
stateset: "0.1"
collections:
  - id: c
    states:
      - name: Crouch
        blocks: [Crouch]
      - name: Default
"#,
        "W-002",
    );
}

#[test]
fn all_diagnostics_are_collected_not_just_the_first() {
    let doc = parse(
        r#"
stateset: "0.9"
collections:
  - id: c
    states:
      - name: ""
        blocks: [Nowhere]
      - name: Crouch
"#,
    )
    .unwrap();
    let result = validate(&doc);
    let rules: Vec<&str> = result.errors.iter().map(|e| e.rule.as_str()).collect();
    assert!(rules.contains(&"S-001"));
    assert!(rules.contains(&"S-003"));
    assert!(rules.contains(&"S-004"));
    assert!(result.warnings.iter().any(|w| w.code == "W-001"));
}

#[test]
fn load_composes_parse_and_validate() {
    let result = stateset::load(sample_yaml()).expect("valid document");
    assert!(result.warnings.is_empty());

    let errors = stateset::load("stateset: \"0.2\"\n").unwrap_err();
    assert!(!errors.is_empty());
}
