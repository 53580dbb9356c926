// tests/attributes/overlay_test.rs
//! Applying attributes documents to a crawled catalog.

#[path = "../common/mod.rs"]
mod common;

use schemascope::attributes::{overlay, AttributesFormat, CatalogAttributes};
use schemascope::diagnostics::{DiagnosticKind, Diagnostics, Phase};
use schemascope::{AttributesInput, CatalogLoader, CrawlOptions};

const ATTRIBUTES_JSON: &str = r#"
{
  "tables": [
    {
      "schema": "books",
      "name": "authors",
      "remarks": ["People who write books.", "Contact details are not kept."],
      "attributes": { "owner": "editorial", "pii": true },
      "columns": [
        { "name": "first_name", "remarks": "Given name", "tags": { "pii": "yes" } },
        { "name": "nickname", "remarks": "Not a real column" },
        { "name": "ID", "remarks": "Names match exactly" }
      ]
    },
    {
      "name": "regions",
      "remarks": "Sales regions"
    },
    {
      "schema": "books",
      "name": "no_such_table",
      "remarks": "Ignored"
    }
  ]
}
"#;

fn document() -> CatalogAttributes {
    CatalogAttributes::parse(ATTRIBUTES_JSON, AttributesFormat::Json).unwrap()
}

#[test]
fn test_overlay_sets_remarks_and_tags() {
    let (_, mut outcome) = common::crawl_fixture();
    let mut diagnostics = Diagnostics::new();

    let applied = overlay::apply(&mut outcome.catalog, &document(), &mut diagnostics);
    assert_eq!(applied, 2);

    let authors = outcome.catalog.find_table(Some("books"), "authors").unwrap();
    assert_eq!(authors.remarks, "People who write books.\nContact details are not kept.");
    assert_eq!(authors.tags["owner"], "editorial");
    assert_eq!(authors.tags["pii"], "true");

    let first_name = authors.column("first_name").unwrap();
    assert_eq!(first_name.remarks, "Given name");
    assert_eq!(first_name.tags["pii"], "yes");

    // No schema given, but the table name is unique in the catalog
    let regions = outcome.catalog.find_table(Some("main"), "regions").unwrap();
    assert_eq!(regions.remarks, "Sales regions");
}

#[test]
fn test_unmatched_entries_are_diagnosed_not_created() {
    let (_, mut outcome) = common::crawl_fixture();
    let mut diagnostics = Diagnostics::new();
    overlay::apply(&mut outcome.catalog, &document(), &mut diagnostics);

    assert_eq!(outcome.catalog.table_count(), common::TABLE_COUNT);
    let authors = outcome.catalog.find_table(Some("books"), "authors").unwrap();
    assert!(authors.column("nickname").is_none());

    let tables: Vec<_> = diagnostics
        .of_kind(DiagnosticKind::UnresolvedTable)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(tables, vec!["books.no_such_table"]);

    let columns: Vec<_> = diagnostics
        .of_kind(DiagnosticKind::UnresolvedColumn)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(columns, vec!["books.authors.nickname", "books.authors.ID"]);
    assert_eq!(authors.column("id").unwrap().remarks, "");
    assert!(diagnostics.iter().all(|d| d.phase == Phase::Overlay));
}

#[test]
fn test_overlay_is_idempotent() {
    let (_, mut once) = common::crawl_fixture();
    let (_, mut twice) = common::crawl_fixture();
    let document = document();

    overlay::apply(&mut once.catalog, &document, &mut Diagnostics::new());
    overlay::apply(&mut twice.catalog, &document, &mut Diagnostics::new());
    overlay::apply(&mut twice.catalog, &document, &mut Diagnostics::new());

    let once_json = serde_json::to_string(&once.catalog).unwrap();
    let twice_json = serde_json::to_string(&twice.catalog).unwrap();
    assert_eq!(once_json, twice_json);
}

#[test]
fn test_blank_remarks_do_not_clear_existing() {
    let (_, mut outcome) = common::crawl_fixture();
    overlay::apply(&mut outcome.catalog, &document(), &mut Diagnostics::new());

    let blank = CatalogAttributes::parse(
        r#"{ "tables": [ { "schema": "books", "name": "authors", "remarks": "  " } ] }"#,
        AttributesFormat::Json,
    )
    .unwrap();
    overlay::apply(&mut outcome.catalog, &blank, &mut Diagnostics::new());

    let authors = outcome.catalog.find_table(Some("books"), "authors").unwrap();
    assert!(authors.remarks.starts_with("People who write books."));
}

#[test]
fn test_toml_document() {
    let toml = r#"
[[tables]]
schema = "for_lint"
name = "writers"
remarks = "Writers for lint checks"

[tables.attributes]
lint = "skip"

[[tables.columns]]
name = "select"
remarks = "Reserved word as a column name"
"#;
    let document = CatalogAttributes::parse(toml, AttributesFormat::Toml).unwrap();
    let (_, mut outcome) = common::crawl_fixture();
    overlay::apply(&mut outcome.catalog, &document, &mut Diagnostics::new());

    let writers = outcome.catalog.find_table(Some("for_lint"), "writers").unwrap();
    assert_eq!(writers.remarks, "Writers for lint checks");
    assert_eq!(writers.tags["lint"], "skip");
    assert_eq!(
        writers.column("select").unwrap().remarks,
        "Reserved word as a column name"
    );
}

#[test]
fn test_loader_records_malformed_document() {
    let loader = CatalogLoader::new(CrawlOptions::default()).with_attributes(AttributesInput::Text {
        source: "{ \"tables\": [ ".to_string(),
        format: AttributesFormat::Json,
    });
    let mut session = common::fixture_session();
    let outcome = loader.load(&mut session).unwrap();

    assert_eq!(outcome.catalog.table_count(), common::TABLE_COUNT);
    assert!(outcome.diagnostics.has_errors());
    assert_eq!(outcome.diagnostics.of_kind(DiagnosticKind::InputFormat).count(), 1);
}
