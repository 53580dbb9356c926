// tests/attributes/weak_association_test.rs
//! Declared and inferred weak associations.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use schemascope::attributes::{weak, AttributesFormat, CatalogAttributes};
use schemascope::catalog::{weak_association_name, AssociationOrigin, SchemaName, TableKey};
use schemascope::diagnostics::{DiagnosticKind, Diagnostics, Phase};
use schemascope::inference::infer_weak_associations;

fn key(schema: &str, table: &str) -> TableKey {
    TableKey::new(SchemaName::named(schema), table)
}

fn parse(json: &str) -> CatalogAttributes {
    CatalogAttributes::parse(json, AttributesFormat::Json).unwrap()
}

#[test]
fn test_declared_association_is_registered_on_both_tables() {
    let document = parse(
        r#"{
          "weakAssociations": [
            {
              "referencedTable": { "schema": "main", "name": "customers" },
              "referencingTable": { "schema": "books", "name": "sales" },
              "columnReferences": { "id": "region" }
            }
          ]
        }"#,
    );
    let (_, mut outcome) = common::crawl_fixture();
    let mut diagnostics = Diagnostics::new();

    let registered =
        weak::resolve_weak_associations(&mut outcome.catalog, &document, &mut diagnostics);
    assert_eq!(registered, 1);
    assert!(diagnostics.is_empty());

    let customers = outcome.catalog.table(&key("main", "customers")).unwrap();
    let sales = outcome.catalog.table(&key("books", "sales")).unwrap();

    let on_customers: Vec<_> = customers.weak_associations().collect();
    let on_sales: Vec<_> = sales.weak_associations().collect();
    assert_eq!(on_customers.len(), 1);
    assert_eq!(on_sales.len(), 1);
    assert!(Arc::ptr_eq(on_customers[0], on_sales[0]));

    let association = on_customers[0];
    assert_eq!(association.origin, AssociationOrigin::Declared);
    assert_eq!(association.referenced, key("main", "customers").column("id"));
    assert_eq!(association.referencing, key("books", "sales").column("region"));
    assert_eq!(
        association.name,
        weak_association_name(&association.referenced, &association.referencing)
    );
    assert!(association.name.starts_with("WA_"));
    assert_eq!(association.name.len(), "WA_".len() + 8 + 1 + 8);

    assert_eq!(outcome.catalog.weak_associations().len(), 1);
}

#[test]
fn test_unresolvable_pairs_are_skipped_alone() {
    let document = parse(
        r#"{
          "weak_associations": [
            {
              "referenced_table": { "schema": "books", "name": "magazines" },
              "referencing_table": { "schema": "books", "name": "article_reviews" },
              "column_references": { "id": "magazine_id", "no_such_pk": "article_id", "title": "nope" }
            }
          ]
        }"#,
    );
    let (_, mut outcome) = common::crawl_fixture();
    let mut diagnostics = Diagnostics::new();

    let registered =
        weak::resolve_weak_associations(&mut outcome.catalog, &document, &mut diagnostics);
    assert_eq!(registered, 1);

    let reviews = outcome.catalog.table(&key("books", "article_reviews")).unwrap();
    let association = reviews.weak_associations().next().unwrap();
    assert_eq!(association.referencing.name, "magazine_id");

    let unresolved: Vec<_> = diagnostics
        .of_kind(DiagnosticKind::UnresolvedColumn)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(
        unresolved,
        vec!["books.magazines.no_such_pk", "books.article_reviews.nope"]
    );
    assert!(diagnostics.iter().all(|d| d.phase == Phase::WeakAssociations));
}

#[test]
fn test_unknown_table_skips_whole_entry() {
    let document = parse(
        r#"{
          "weakAssociations": [
            {
              "referencedTable": { "schema": "books", "name": "ghosts" },
              "referencingTable": { "schema": "books", "name": "sales" },
              "columnReferences": { "id": "book_id" }
            }
          ]
        }"#,
    );
    let (_, mut outcome) = common::crawl_fixture();
    let mut diagnostics = Diagnostics::new();

    let registered =
        weak::resolve_weak_associations(&mut outcome.catalog, &document, &mut diagnostics);
    assert_eq!(registered, 0);
    assert!(outcome.catalog.weak_associations().is_empty());

    let tables: Vec<_> = diagnostics
        .of_kind(DiagnosticKind::UnresolvedTable)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(tables, vec!["books.ghosts"]);
}

#[test]
fn test_resolving_twice_does_not_duplicate() {
    let document = parse(
        r#"{
          "weakAssociations": [
            {
              "referencedTable": { "schema": "books", "name": "books" },
              "referencingTable": { "schema": "books", "name": "book_authors" },
              "columnReferences": { "id": "book_id" }
            }
          ]
        }"#,
    );
    let (_, mut outcome) = common::crawl_fixture();

    weak::resolve_weak_associations(&mut outcome.catalog, &document, &mut Diagnostics::new());
    weak::resolve_weak_associations(&mut outcome.catalog, &document, &mut Diagnostics::new());

    let book_authors = outcome.catalog.table(&key("books", "book_authors")).unwrap();
    assert_eq!(book_authors.weak_associations().count(), 1);
    assert_eq!(outcome.catalog.weak_associations().len(), 1);
}

#[test]
fn test_inference_from_naming_conventions() {
    let (_, mut outcome) = common::crawl_fixture();
    let mut diagnostics = Diagnostics::new();

    let registered = infer_weak_associations(&mut outcome.catalog, &mut diagnostics);
    assert_eq!(registered, 1);

    let book_authors = outcome.catalog.table(&key("books", "book_authors")).unwrap();
    let inferred: Vec<_> = book_authors.weak_associations().collect();
    assert_eq!(inferred.len(), 1);
    assert_eq!(inferred[0].origin, AssociationOrigin::Inferred);
    assert_eq!(inferred[0].referencing.name, "book_id");
    assert_eq!(inferred[0].referenced, key("books", "books").column("id"));

    // author_id already has a declared foreign key
    assert!(book_authors
        .weak_associations()
        .all(|a| a.referencing.name != "author_id"));

    let books = outcome.catalog.table(&key("books", "books")).unwrap();
    assert!(Arc::ptr_eq(books.weak_associations().next().unwrap(), inferred[0]));
    assert_eq!(diagnostics.of_kind(DiagnosticKind::Inferred).count(), 1);
}
