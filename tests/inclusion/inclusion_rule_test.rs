// tests/inclusion/inclusion_rule_test.rs
use schemascope::dialect::Dialect;
use schemascope::error::ConfigurationError;
use schemascope::inclusion::{ExclusionList, InclusionRule};

#[test]
fn test_include_all_and_exclude_all() {
    for name in ["", "main", "books.authors", "books.authors.id"] {
        assert!(InclusionRule::IncludeAll.test(name));
        assert!(!InclusionRule::ExcludeAll.test(name));
    }
}

#[test]
fn test_pattern_without_exclude() {
    let rule = InclusionRule::pattern("books\\.(authors|publishers)", None).unwrap();
    assert!(rule.test("books.authors"));
    assert!(rule.test("books.publishers"));
    assert!(!rule.test("books.authors_archive"));
    assert!(!rule.test("main.books.authors"));
}

#[test]
fn test_from_patterns_defaults() {
    let everything = InclusionRule::from_patterns(None, None).unwrap();
    assert!(everything.test("anything.at.all"));

    let exclude_only = InclusionRule::from_patterns(None, Some(".*\\.temp_.*")).unwrap();
    assert!(exclude_only.test("main.orders"));
    assert!(!exclude_only.test("main.temp_orders"));
}

#[test]
fn test_composite_exclusion_wins() {
    let include = InclusionRule::pattern("books|main", None).unwrap();
    let rule = include.and(InclusionRule::Exclusions(ExclusionList::new(["books"])));

    assert!(rule.test("main"));
    assert!(!rule.test("books"));
    assert!(!rule.test("for_lint"));
}

#[test]
fn test_composite_of_composites() {
    let rule = InclusionRule::pattern(".*", Some("temp")).unwrap().and(
        InclusionRule::Composite(vec![
            InclusionRule::Exclusions(ExclusionList::new(["audit"])),
            InclusionRule::pattern("[a-z_]+", None).unwrap(),
        ]),
    );

    assert!(rule.test("main"));
    assert!(!rule.test("temp"));
    assert!(!rule.test("audit"));
    assert!(!rule.test("Main"));
}

#[test]
fn test_include_all_is_identity_for_and() {
    let exclusions = InclusionRule::Exclusions(ExclusionList::new(["temp"]));
    let rule = InclusionRule::IncludeAll.and(exclusions);
    assert!(matches!(rule, InclusionRule::Exclusions(_)));
}

#[test]
fn test_dialect_schema_exclusions() {
    let oracle = Dialect::Oracle.schema_exclusions();
    assert!(!oracle.test("SYS"));
    assert!(!oracle.test("APEX_190100"));
    assert!(oracle.test("SALES"));

    let sqlite = Dialect::Sqlite.schema_exclusions();
    assert!(!sqlite.test("temp"));
    assert!(sqlite.test("main"));

    let ansi = Dialect::InformationSchema.schema_exclusions();
    assert!(!ansi.test("information_schema"));
    assert!(ansi.test("public"));
}

#[test]
fn test_invalid_pattern_is_configuration_error() {
    let err = InclusionRule::pattern("books\\.(", None).unwrap_err();
    match err {
        ConfigurationError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "books\\.("),
        other => panic!("expected invalid pattern, got {:?}", other),
    }
}
