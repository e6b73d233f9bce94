//! Integration tests for selector grammar validation
//!
//! Tests each grammar rule in isolation and the property that well-formed
//! names never produce violations.

use pcos_analysis::{AnalysisConfig, DiagnosticCode, parse_class_name, validate_class_name, validate_selector};
use pcos_syntax::DeclKind;
use proptest::prelude::*;

fn codes(name: &str, kind: DeclKind) -> Vec<DiagnosticCode> {
    validate_class_name(name, kind, &AnalysisConfig::default())
        .into_iter()
        .map(|v| v.code)
        .collect()
}

// =============================================================================
// Single-Rule Violations
// =============================================================================

#[test]
fn violations_name_their_rule() {
    let config = AnalysisConfig::default();
    let missing = validate_class_name("button", DeclKind::Component, &config);
    assert!(missing[0].message.starts_with("missing type prefix: "), "{}", missing[0].message);
    let deep = validate_class_name("c-button__icon__legend", DeclKind::Component, &config);
    assert!(deep[0].message.starts_with("element nesting depth exceeded: "), "{}", deep[0].message);
}

#[test]
fn valid_names_pass() {
    for name in [
        "c-button",
        "c-button--primary",
        "c-button__icon",
        "c-button__icon--large",
        "c-card-list2",
        ".c-nav__item",
    ] {
        assert!(codes(name, DeclKind::Component).is_empty(), "{name}");
    }
    assert!(codes("u-text-center", DeclKind::Utility).is_empty());
}

#[test]
fn missing_prefix() {
    let violations = validate_class_name("button", DeclKind::Component, &AnalysisConfig::default());
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].code, DiagnosticCode::MissingPrefix);
    assert_eq!(violations[0].suggestion.as_deref(), Some("c-button"));

    let utility = validate_class_name("hidden", DeclKind::Utility, &AnalysisConfig::default());
    assert_eq!(utility[0].suggestion.as_deref(), Some("u-hidden"));
}

#[test]
fn element_depth() {
    let violations = validate_class_name(
        "c-button__icon__legend",
        DeclKind::Component,
        &AnalysisConfig::default(),
    );
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].code, DiagnosticCode::ElementDepth);
    assert_eq!(violations[0].suggestion.as_deref(), Some("c-button__icon-legend"));
}

#[test]
fn element_depth_follows_config() {
    let config = AnalysisConfig::default().with_max_element_nesting_depth(2);
    assert!(validate_class_name("c-button__icon__legend", DeclKind::Component, &config).is_empty());
}

#[test]
fn unknown_prefix() {
    assert_eq!(codes("x-button", DeclKind::Component), vec![DiagnosticCode::UnknownPrefix]);
}

#[test]
fn prefix_kind_mismatch() {
    assert_eq!(codes("u-button", DeclKind::Component), vec![DiagnosticCode::PrefixKindMismatch]);
    assert_eq!(codes("c-hidden", DeclKind::Utility), vec![DiagnosticCode::PrefixKindMismatch]);
}

#[test]
fn invalid_segment() {
    let violations =
        validate_class_name("c-Button_primary", DeclKind::Component, &AnalysisConfig::default());
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].code, DiagnosticCode::InvalidSegment);
    assert_eq!(violations[0].suggestion.as_deref(), Some("c-button-primary"));
}

#[test]
fn multiple_modifiers() {
    assert_eq!(
        codes("c-button--large--primary", DeclKind::Component),
        vec![DiagnosticCode::MultipleModifiers]
    );
}

// =============================================================================
// Selectors
// =============================================================================

#[test]
fn selector_checks_every_class_once_per_rule() {
    let config = AnalysisConfig::default();
    let violations = validate_selector(
        ".c-nav > .item:hover, .link[data-x='.y']",
        DeclKind::Component,
        &config,
    );
    let found: Vec<_> = violations.iter().map(|v| v.code).collect();
    assert_eq!(found, vec![DiagnosticCode::MissingPrefix]);
}

#[test]
fn namespaces_are_recognised() {
    let config = AnalysisConfig::default().with_namespace("shop");
    let class = parse_class_name("c-shop-cart__item--empty", &config);
    assert_eq!(class.prefix.as_deref(), Some("c"));
    assert_eq!(class.namespace.as_deref(), Some("shop"));
    assert_eq!(class.block, "cart");
    assert_eq!(class.elements[0].name, "item");
    assert_eq!(class.elements[0].modifiers, vec!["empty".to_string()]);
    assert_eq!(class.to_class_string(), "c-shop-cart__item--empty");
}

// =============================================================================
// Property Tests
// =============================================================================

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}(-[a-z0-9]{1,4}){0,2}"
}

fn valid_name() -> impl Strategy<Value = (DeclKind, String)> {
    (
        prop_oneof![Just(DeclKind::Component), Just(DeclKind::Utility)],
        segment(),
        prop::option::of(segment()),
        prop::option::of(segment()),
        any::<bool>(),
    )
        .prop_map(|(kind, block, element, modifier, on_block)| {
            let prefix = if kind == DeclKind::Utility { "u" } else { "c" };
            let mut name = format!("{prefix}-{block}");
            if on_block {
                if let Some(modifier) = &modifier {
                    name.push_str(&format!("--{modifier}"));
                }
            }
            if let Some(element) = element {
                name.push_str(&format!("__{element}"));
                if !on_block {
                    if let Some(modifier) = &modifier {
                        name.push_str(&format!("--{modifier}"));
                    }
                }
            }
            (kind, name)
        })
}

proptest! {
    #[test]
    fn grammar_names_have_no_violations((kind, name) in valid_name()) {
        let violations = validate_class_name(&name, kind, &AnalysisConfig::default());
        prop_assert!(violations.is_empty(), "{name}: {violations:?}");
    }

    #[test]
    fn unprefixed_names_report_only_missing_prefix(block in "[a-z][a-z0-9]{0,8}") {
        let violations = validate_class_name(&block, DeclKind::Component, &AnalysisConfig::default());
        prop_assert_eq!(violations.len(), 1);
        prop_assert_eq!(violations[0].code, DiagnosticCode::MissingPrefix);
    }

    #[test]
    fn parse_then_print_is_identity((_kind, name) in valid_name()) {
        let class = parse_class_name(&name, &AnalysisConfig::default());
        prop_assert_eq!(class.to_class_string(), name);
    }
}
