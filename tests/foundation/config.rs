//! Integration tests for AnalysisConfig
//!
//! Tests defaults and builder overrides.

use pcos_foundation::{AnalysisConfig, Severity};

#[test]
fn default_config() {
    let config = AnalysisConfig::default();
    let prefixes: Vec<_> = config.allowed_prefixes.iter().map(String::as_str).collect();
    assert_eq!(prefixes, vec!["c", "u"]);
    assert_eq!(config.max_element_nesting_depth, 1);
    assert!(config.treat_unresolved_implements_as_error);
    assert_eq!(config.type_mismatch_severity, Severity::Warning);
    assert!(config.namespaces.is_empty());
    assert!(!config.validate_bare_selectors);
    assert_eq!(config, AnalysisConfig::new());
}

#[test]
fn builder_chain() {
    let config = AnalysisConfig::new()
        .with_allowed_prefixes(["c", "u", "l"])
        .with_max_element_nesting_depth(3)
        .with_unresolved_implements_as_error(false)
        .with_type_mismatch_severity(Severity::Error)
        .with_namespace("shop")
        .with_bare_selector_validation(true);
    assert!(config.is_allowed_prefix("l"));
    assert_eq!(config.max_element_nesting_depth, 3);
    assert_eq!(config.unresolved_implements_severity(), Severity::Warning);
    assert_eq!(config.type_mismatch_severity, Severity::Error);
    assert!(config.namespaces.contains("shop"));
    assert!(config.validate_bare_selectors);
}

#[test]
fn replacing_prefixes_drops_defaults() {
    let config = AnalysisConfig::new().with_allowed_prefixes(["x"]);
    assert!(config.is_allowed_prefix("x"));
    assert!(!config.is_allowed_prefix("c"));
}
