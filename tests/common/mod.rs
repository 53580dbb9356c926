// tests/common/mod.rs
//! Shared test database: 19 tables over three schemas.
//!
//! `main` holds a small order-taking model, `books` (attached) a publishing
//! model with composite keys, and `for_lint` (attached) tables with awkward
//! shapes: reserved-word columns, no primary key, a self reference.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use schemascope::dialect::{Dialect, InformationSchemaKey, QueryTemplates};
use schemascope::retrieve::{CrawlOptions, CrawlOutcome, Crawler};
use schemascope::session::{
    MetadataRow, MetadataSource, QueryParams, RetrieverSession, SourceError, SqliteSource,
};

pub const TABLE_COUNT: usize = 19;

const MAIN_DDL: &str = r#"
CREATE TABLE main.regions (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE main.countries (
    id INTEGER PRIMARY KEY,
    region_id INTEGER NOT NULL REFERENCES regions(id),
    name TEXT NOT NULL
);
CREATE TABLE main.customers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT,
    country_id INTEGER REFERENCES countries(id)
);
CREATE INDEX main.idx_customers_email ON customers(email DESC);
CREATE TABLE main.orders (
    id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers ON DELETE CASCADE,
    ordered_on TEXT DEFAULT CURRENT_DATE
);
CREATE VIEW main.order_summary AS
    SELECT o.id, c.name AS customer_name, o.ordered_on
    FROM orders o JOIN customers c ON c.id = o.customer_id;
"#;

const BOOKS_DDL: &str = r#"
CREATE TABLE books.authors (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
);
CREATE INDEX books.idx_authors_name ON authors(last_name, first_name);
CREATE TABLE books.publishers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE books.books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    publisher_id INTEGER NOT NULL REFERENCES publishers(id),
    price REAL,
    previous_edition_id INTEGER REFERENCES books(id)
);
CREATE TABLE books.book_authors (
    book_id INTEGER NOT NULL,
    author_id INTEGER NOT NULL REFERENCES authors(id),
    ordinal INTEGER,
    PRIMARY KEY (book_id, author_id)
);
CREATE INDEX books.idx_book_authors_author ON book_authors(author_id);
CREATE TABLE books.sales (
    id INTEGER PRIMARY KEY,
    book_id INTEGER REFERENCES books(id),
    region TEXT,
    sale_date TEXT,
    amount REAL
);
CREATE TABLE books.magazines (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL
);
CREATE TABLE books.articles (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL
);
CREATE TABLE books.magazine_articles (
    magazine_id INTEGER NOT NULL REFERENCES magazines(id),
    article_id INTEGER NOT NULL REFERENCES articles(id),
    PRIMARY KEY (magazine_id, article_id)
);
CREATE TABLE books.article_reviews (
    id INTEGER PRIMARY KEY,
    magazine_id INTEGER NOT NULL,
    article_id INTEGER NOT NULL,
    review TEXT,
    FOREIGN KEY (magazine_id, article_id)
        REFERENCES magazine_articles(magazine_id, article_id)
);
"#;

const FOR_LINT_DDL: &str = r#"
CREATE TABLE for_lint.writers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    "select" TEXT,
    "UPPER_CASE" TEXT
);
CREATE TABLE for_lint.publications (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    writer_id INTEGER REFERENCES writers(id)
);
CREATE UNIQUE INDEX for_lint.idx_publications_title ON publications(title);
CREATE TABLE for_lint.extra_pk (
    id INTEGER PRIMARY KEY,
    publication_id INTEGER NOT NULL REFERENCES publications(id)
);
CREATE TABLE for_lint.no_pk_table (
    value TEXT,
    "comment" TEXT
);
CREATE TABLE for_lint.self_ref (
    id INTEGER PRIMARY KEY,
    parent_id INTEGER REFERENCES self_ref(id)
);
"#;

/// The test database, with `books` and `for_lint` attached in memory.
pub fn fixture_source() -> SqliteSource {
    let mut source = SqliteSource::open_in_memory().unwrap();
    source.attach("books", ":memory:").unwrap();
    source.attach("for_lint", ":memory:").unwrap();
    source
        .connection()
        .execute_batch(&format!("{}{}{}", MAIN_DDL, BOOKS_DDL, FOR_LINT_DDL))
        .unwrap();
    source
}

pub fn sqlite_templates() -> QueryTemplates {
    QueryTemplates::for_dialect(Dialect::Sqlite)
}

pub fn fixture_session() -> RetrieverSession {
    RetrieverSession::new(fixture_source(), sqlite_templates())
}

/// Parameters of every query a [`RecordingSource`] was asked to run.
pub type QueryLog = Arc<Mutex<Vec<QueryParams>>>;

/// Wraps the fixture source and records the parameters of each query.
pub struct RecordingSource {
    inner: SqliteSource,
    log: QueryLog,
}

impl MetadataSource for RecordingSource {
    fn describe(&self) -> String {
        format!("recording {}", self.inner.describe())
    }

    fn query(&mut self, sql: &str, params: &QueryParams) -> Result<Vec<MetadataRow>, SourceError> {
        self.log.lock().unwrap().push(params.clone());
        self.inner.query(sql, params)
    }

    fn set_query_timeout(&mut self, timeout: Option<Duration>) {
        self.inner.set_query_timeout(timeout);
    }
}

/// A fixture session whose queries are logged.
pub fn recording_session() -> (RetrieverSession, QueryLog) {
    let log = QueryLog::default();
    let source = RecordingSource {
        inner: fixture_source(),
        log: Arc::clone(&log),
    };
    (RetrieverSession::new(source, sqlite_templates()), log)
}

/// Crawl the whole fixture with the built-in SQLite templates.
pub fn crawl_fixture() -> (RetrieverSession, CrawlOutcome) {
    let mut session = fixture_session();
    let outcome = Crawler::new(CrawlOptions::default())
        .crawl(&mut session)
        .unwrap();
    (session, outcome)
}

/// An extension query returning fixed remarks and definition for every index.
pub const EXT_INDEXES_SQL: &str = "\
    SELECT NULL AS INDEX_CATALOG, :schema AS INDEX_SCHEMA, :table AS TABLE_NAME, \
    il.name AS INDEX_NAME, 'TEST Index remarks' AS REMARKS, \
    'TEST Index definition' AS INDEX_DEFINITION \
    FROM pragma_index_list(:table, :schema) AS il";

/// An extension query returning a fixed definition for every key column.
pub const EXT_INDEX_COLUMNS_SQL: &str = "\
    SELECT NULL AS INDEX_CATALOG, :schema AS INDEX_SCHEMA, :table AS TABLE_NAME, \
    il.name AS INDEX_NAME, ic.name AS COLUMN_NAME, 1 AS IS_GENERATED, \
    'TEST INDEX COLUMN DEFINITION' AS INDEX_COLUMN_DEFINITION \
    FROM pragma_index_list(:table, :schema) AS il \
    JOIN pragma_index_xinfo(il.name, :schema) AS ic \
    WHERE ic.key = 1";

/// The SQLite templates with both index extension queries registered.
pub fn extended_templates() -> QueryTemplates {
    sqlite_templates()
        .with_sql(InformationSchemaKey::ExtIndexes, EXT_INDEXES_SQL)
        .with_sql(InformationSchemaKey::ExtIndexColumns, EXT_INDEX_COLUMNS_SQL)
}
