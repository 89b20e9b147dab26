//! Bounded worker pool fetching repository pages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::extract::extract_repository_detail;
use crate::fetcher::PageFetcher;
use crate::result::RepositoryDetail;

/// Default number of concurrent repository fetches, one results page worth.
pub const DEFAULT_WORKERS: usize = 10;

/// Fetches and parses one repository page. Failures are logged and yield `None`.
pub async fn fetch_repository_detail(fetcher: &dyn PageFetcher, url: &str) -> Option<RepositoryDetail> {
    let page = match fetcher.fetch(url, &[]).await {
        Ok(page) => page,
        Err(e) => {
            error!("Failed to request github repository page {}: {}", url, e);
            return None;
        }
    };

    if !page.is_success() {
        error!(
            "Failed to request github repository page {} (status {})",
            url,
            page.status.as_u16()
        );
        return None;
    }

    match extract_repository_detail(&page.body) {
        Ok(detail) => Some(detail),
        Err(e) => {
            error!("Failed to parse github repository page {}: {}", url, e);
            None
        }
    }
}

/// Enriches every URL with at most `workers` fetches in flight.
///
/// The output has one slot per input URL, in input order. Workers claim
/// indices from a shared counter and report each result as soon as it
/// completes, so a failed fetch or a crashed worker leaves only the slot it
/// was working on empty.
pub async fn enrich_repositories(
    fetcher: Arc<dyn PageFetcher>,
    urls: Vec<String>,
    workers: usize,
) -> Vec<Option<RepositoryDetail>> {
    let mut slots: Vec<Option<RepositoryDetail>> = vec![None; urls.len()];
    if urls.is_empty() {
        return slots;
    }

    let workers = workers.clamp(1, urls.len());
    debug!("Enriching {} repositories with {} workers", urls.len(), workers);

    let urls: Arc<[String]> = urls.into();
    let next = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let fetcher = Arc::clone(&fetcher);
            let urls = Arc::clone(&urls);
            let next = Arc::clone(&next);
            let tx = tx.clone();

            tokio::spawn(async move {
                loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(url) = urls.get(index) else {
                        break;
                    };
                    let detail = fetch_repository_detail(fetcher.as_ref(), url).await;
                    if tx.send((index, detail)).is_err() {
                        break;
                    }
                }
            })
        })
        .collect();
    drop(tx);

    while let Some((index, detail)) = rx.recv().await {
        slots[index] = detail;
    }

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            warn!("Repository worker failed: {}", e);
        }
    }

    slots
}
