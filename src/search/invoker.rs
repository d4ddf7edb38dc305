//! Search execution: one query end-to-end

use crate::engines::{SearchSession, TextSearch};
use crate::results::{SearchResponse, SearchResult};
use futures::TryStreamExt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run one search on `backend` and collapse the outcome into a response.
///
/// Never fails: any error while opening the session or reading records is
/// reported through [`SearchResponse::Failure`], and records read before the
/// error are discarded. Non-positive `max_results` means "no cap".
pub async fn search<B: TextSearch>(backend: &B, query: &str, max_results: i64) -> SearchResponse {
    let start = Instant::now();

    match collect_results(backend, query, result_cap(max_results)).await {
        Ok(results) => {
            info!(
                "Search '{}' on {} returned {} results in {:?}",
                query,
                backend.name(),
                results.len(),
                start.elapsed()
            );
            SearchResponse::success(query, results)
        }
        Err(e) => {
            warn!("Search '{}' on {} failed: {:#}", query, backend.name(), e);
            SearchResponse::failure(query, error_text(&e))
        }
    }
}

async fn collect_results<B: TextSearch>(
    backend: &B,
    query: &str,
    cap: Option<usize>,
) -> anyhow::Result<Vec<SearchResult>> {
    let mut session = backend.open().await?;
    debug!("Session opened on {} (cap: {:?})", backend.name(), cap);

    let mut records = session.text(query, cap);
    let mut results = Vec::new();
    while let Some(record) = records.try_next().await? {
        results.push(SearchResult::from_record(record));
    }

    Ok(results)
}

/// Positive values cap the result count; anything else leaves it open
fn result_cap(max_results: i64) -> Option<usize> {
    usize::try_from(max_results).ok().filter(|cap| *cap > 0)
}

fn error_text(error: &anyhow::Error) -> String {
    let text = format!("{:#}", error);
    if text.trim().is_empty() {
        "search failed".to_string()
    } else {
        text
    }
}
