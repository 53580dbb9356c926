//! # schemascope
//!
//! Crawls relational database metadata into a normalized, read-only catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        RetrieverSession (connection + query templates)   │
//! │        dialect templates, inclusion rules, timeout       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [retrieve]
//! ┌─────────────────────────────────────────────────────────┐
//! │  schemas → tables → columns → indexes → primary keys     │
//! │  → extension tables/indexes/columns → foreign keys       │
//! │  → routines                                              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [inference, attributes]
//! ┌─────────────────────────────────────────────────────────┐
//! │  naming-convention inference (optional)                  │
//! │  remarks/tags overlay, declared weak associations        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │            Arc<Catalog> + Diagnostics                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use schemascope::dialect::{Dialect, QueryTemplates};
//! use schemascope::retrieve::{CrawlOptions, Crawler};
//! use schemascope::session::{RetrieverSession, SqliteSource};
//!
//! let source = SqliteSource::open_in_memory().unwrap();
//! source
//!     .connection()
//!     .execute_batch("CREATE TABLE regions (id INTEGER PRIMARY KEY, name TEXT NOT NULL);")
//!     .unwrap();
//!
//! let mut session = RetrieverSession::new(source, QueryTemplates::for_dialect(Dialect::Sqlite));
//! let outcome = Crawler::new(CrawlOptions::default()).crawl(&mut session).unwrap();
//!
//! let table = outcome.catalog.find_table(Some("main"), "regions").unwrap();
//! assert_eq!(table.columns().len(), 2);
//! ```

pub mod attributes;
pub mod capability;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod inclusion;
pub mod inference;
pub mod loader;
pub mod retrieve;
pub mod session;

pub use catalog::Catalog;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConfigurationError, CrawlError, CrawlResult, RetrievalError};
pub use loader::{load_from_settings, AttributesInput, CatalogLoader, LoadError};
pub use retrieve::{crawl_concurrently, CrawlOptions, CrawlOutcome, Crawler};
pub use session::RetrieverSession;
