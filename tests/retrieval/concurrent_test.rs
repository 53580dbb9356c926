// tests/retrieval/concurrent_test.rs
//! Crawling independent sessions side by side.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use schemascope::catalog::{SchemaName, TableKey};
use schemascope::dialect::InformationSchemaKey;
use schemascope::error::{ConfigurationError, CrawlError};
use schemascope::retrieve::{crawl_concurrently, CrawlOptions};
use schemascope::session::{RetrieverSession, SqliteSource};

fn session_with(ddl: &str) -> RetrieverSession {
    let source = SqliteSource::open_in_memory().unwrap();
    source.connection().execute_batch(ddl).unwrap();
    RetrieverSession::new(source, common::sqlite_templates())
}

fn main_table(name: &str) -> TableKey {
    TableKey::new(SchemaName::named("main"), name)
}

#[tokio::test]
async fn test_concurrent_crawl_merges_catalogs() {
    let sessions = vec![
        common::fixture_session(),
        session_with("CREATE TABLE warehouses (id INTEGER PRIMARY KEY, city TEXT);"),
        session_with("CREATE TABLE carriers (id INTEGER PRIMARY KEY, name TEXT);"),
    ];

    let outcome = crawl_concurrently(sessions, CrawlOptions::default()).await.unwrap();
    let catalog = &outcome.catalog;

    assert_eq!(catalog.table_count(), common::TABLE_COUNT + 2);
    assert!(catalog.table(&main_table("warehouses")).is_some());
    assert!(catalog.table(&main_table("carriers")).is_some());
    assert!(catalog.find_table(Some("books"), "book_authors").is_some());
}

#[tokio::test]
async fn test_later_session_wins_on_conflict() {
    let sessions = vec![
        session_with("CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT);"),
        session_with("CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT, code TEXT);"),
    ];

    let outcome = crawl_concurrently(sessions, CrawlOptions::default()).await.unwrap();
    let regions = outcome.catalog.table(&main_table("regions")).unwrap();
    assert_eq!(regions.columns().len(), 3);
    assert!(regions.column("code").is_some());
}

#[tokio::test]
async fn test_merge_keeps_foreign_keys_on_both_tables() {
    let sessions = vec![
        session_with(
            "CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE countries (id INTEGER PRIMARY KEY,
                                     region_id INTEGER REFERENCES regions(id));",
        ),
        session_with("CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT);"),
    ];

    let outcome = crawl_concurrently(sessions, CrawlOptions::default()).await.unwrap();
    let regions = outcome.catalog.table(&main_table("regions")).unwrap();
    let countries = outcome.catalog.table(&main_table("countries")).unwrap();

    let on_regions: Vec<_> = regions.foreign_keys().collect();
    let on_countries: Vec<_> = countries.foreign_keys().collect();
    assert_eq!(on_regions.len(), 1);
    assert_eq!(on_countries.len(), 1);
    assert!(Arc::ptr_eq(on_regions[0], on_countries[0]));
}

#[tokio::test]
async fn test_merge_drops_foreign_key_whose_column_is_gone() {
    let sessions = vec![
        session_with(
            "CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE countries (id INTEGER PRIMARY KEY,
                                     region_id INTEGER REFERENCES regions(id));",
        ),
        session_with("CREATE TABLE countries (id INTEGER PRIMARY KEY, name TEXT);"),
    ];

    let outcome = crawl_concurrently(sessions, CrawlOptions::default()).await.unwrap();
    let regions = outcome.catalog.table(&main_table("regions")).unwrap();
    let countries = outcome.catalog.table(&main_table("countries")).unwrap();

    assert!(countries.column("region_id").is_none());
    assert_eq!(regions.foreign_keys().count(), 0);
    assert_eq!(countries.foreign_keys().count(), 0);
}

#[tokio::test]
async fn test_failed_session_fails_the_crawl() {
    let broken = RetrieverSession::new(
        SqliteSource::open_in_memory().unwrap(),
        common::sqlite_templates().without(InformationSchemaKey::Tables),
    );
    let sessions = vec![common::fixture_session(), broken];

    let err = crawl_concurrently(sessions, CrawlOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CrawlError::Configuration(ConfigurationError::MissingQuery(InformationSchemaKey::Tables))
    ));
}

#[tokio::test]
async fn test_shared_catalog_is_readable_from_tasks() {
    let outcome = crawl_concurrently(vec![common::fixture_session()], CrawlOptions::default())
        .await
        .unwrap();
    let (catalog, _) = outcome.into_shared();

    let handles: Vec<_> = ["main", "books", "for_lint"]
        .into_iter()
        .map(|schema| {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.tables_in(&SchemaName::named(schema)).count() })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap();
    }
    assert_eq!(total, common::TABLE_COUNT);
}
