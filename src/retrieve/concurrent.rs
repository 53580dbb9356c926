//! Crawling several sessions at once.
//!
//! Each session owns its own connection, so sessions can run side by side
//! on blocking worker threads. Every worker builds a private catalog; the
//! partial catalogs are merged afterwards, one at a time, in the order the
//! sessions were given.

use futures::future::join_all;

use super::{CrawlOptions, CrawlOutcome, Crawler};
use crate::error::CrawlResult;
use crate::session::RetrieverSession;

/// Crawl each session on its own worker and merge the results.
///
/// Later sessions win when two of them produce the same qualified name. The
/// first failed crawl, in submission order, is returned as the error.
pub async fn crawl_concurrently(
    sessions: Vec<RetrieverSession>,
    options: CrawlOptions,
) -> CrawlResult<CrawlOutcome> {
    let workers = sessions.len();
    tracing::info!(workers, "starting concurrent crawl");

    let handles: Vec<_> = sessions
        .into_iter()
        .map(|mut session| {
            let crawler = Crawler::new(options.clone());
            tokio::task::spawn_blocking(move || crawler.crawl(&mut session))
        })
        .collect();

    let results = join_all(handles).await;

    let mut merged = CrawlOutcome::default();
    for result in results {
        let outcome = result??;
        merged.catalog.merge(outcome.catalog);
        merged.diagnostics.extend(outcome.diagnostics);
    }

    tracing::info!(
        workers,
        tables = merged.catalog.table_count(),
        "concurrent crawl merged"
    );
    Ok(merged)
}
