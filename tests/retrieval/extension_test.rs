// tests/retrieval/extension_test.rs
//! Extension steps layered over a finished crawl.

#[path = "../common/mod.rs"]
mod common;

use schemascope::diagnostics::DiagnosticKind;
use schemascope::dialect::{InformationSchemaKey, QueryTemplates};
use schemascope::retrieve::{CrawlOptions, CrawlOutcome, Crawler, RetrievalStep};
use schemascope::session::RetrieverSession;

/// Crawl with the built-in templates, then rebuild the session over the
/// same connection with the extension queries registered.
fn crawl_then_extend(templates: QueryTemplates) -> (RetrieverSession, CrawlOutcome) {
    let (session, outcome) = common::crawl_fixture();
    let session = RetrieverSession::from_boxed(session.into_source(), templates);
    (session, outcome)
}

#[test]
fn test_extended_index_remarks_and_definition() {
    let (mut session, mut outcome) = crawl_then_extend(common::extended_templates());
    Crawler::new(CrawlOptions::default())
        .run_step(&mut session, RetrievalStep::ExtIndexes, &mut outcome)
        .unwrap();

    assert_eq!(outcome.catalog.table_count(), common::TABLE_COUNT);
    let mut index_count = 0;
    for table in outcome.catalog.tables() {
        for index in table.indexes() {
            index_count += 1;
            assert_eq!(index.remarks, "TEST Index remarks", "{}", index.name);
            assert_eq!(index.definition, "TEST Index definition", "{}", index.name);
        }
    }
    assert!(index_count > 0);
}

#[test]
fn test_extended_index_column_definition() {
    let (mut session, mut outcome) = crawl_then_extend(common::extended_templates());
    Crawler::new(CrawlOptions::default())
        .run_step(&mut session, RetrievalStep::ExtIndexColumns, &mut outcome)
        .unwrap();

    let mut column_count = 0;
    for table in outcome.catalog.tables() {
        for index in table.indexes() {
            for column in index.columns() {
                column_count += 1;
                assert_eq!(column.definition, "TEST INDEX COLUMN DEFINITION");
                assert!(column.generated, "{}.{}", index.name, column.name);
            }
        }
    }
    assert!(column_count > 0);
}

#[test]
fn test_full_crawl_runs_extension_steps() {
    let mut session = RetrieverSession::new(common::fixture_source(), common::extended_templates());
    let outcome = Crawler::new(CrawlOptions::default())
        .crawl(&mut session)
        .unwrap();

    for table in outcome.catalog.tables() {
        for index in table.indexes() {
            assert_eq!(index.definition, "TEST Index definition");
            assert!(index.columns().iter().all(|c| c.generated));
        }
    }
}

#[test]
fn test_extended_tables_overwrite_definition() {
    let templates = common::sqlite_templates().with_sql(
        InformationSchemaKey::ExtTables,
        "SELECT NULL AS TABLE_CATALOG, t.schema AS TABLE_SCHEMA, t.name AS TABLE_NAME, \
         s.sql AS TABLE_DEFINITION, 'from extension' AS REMARKS \
         FROM pragma_table_list AS t \
         JOIN sqlite_schema AS s ON s.name = t.name \
         WHERE t.schema = 'main' AND t.type = 'view'",
    );
    let (mut session, mut outcome) = crawl_then_extend(templates);
    Crawler::new(CrawlOptions::default())
        .run_step(&mut session, RetrievalStep::ExtTables, &mut outcome)
        .unwrap();

    let summary = outcome.catalog.find_table(Some("main"), "order_summary").unwrap();
    assert!(summary.definition.starts_with("CREATE VIEW"));
    assert_eq!(summary.remarks, "from extension");

    let orders = outcome.catalog.find_table(Some("main"), "orders").unwrap();
    assert_eq!(orders.definition, "");
}

#[test]
fn test_extension_row_for_unknown_index() {
    let templates = common::sqlite_templates().with_sql(
        InformationSchemaKey::ExtIndexes,
        "SELECT NULL AS INDEX_CATALOG, 'books' AS INDEX_SCHEMA, 'authors' AS TABLE_NAME, \
         'idx_does_not_exist' AS INDEX_NAME, 'remarks' AS REMARKS",
    );
    let (mut session, mut outcome) = crawl_then_extend(templates);
    Crawler::new(CrawlOptions::default())
        .run_step(&mut session, RetrievalStep::ExtIndexes, &mut outcome)
        .unwrap();

    let missing: Vec<_> = outcome
        .diagnostics
        .of_kind(DiagnosticKind::MissingParent)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(missing, vec!["books.authors.idx_does_not_exist"]);

    let authors = outcome.catalog.find_table(Some("books"), "authors").unwrap();
    assert!(authors.index("idx_does_not_exist").is_none());
}
