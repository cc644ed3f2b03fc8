//! Worker loop: pop, claim, fetch, extract, enqueue

use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::{Fetcher, FetcherFactory};
use crate::crawler::frontier::Next;
use crate::crawler::parser::LinkExtractor;
use crate::state::PageOutcome;
use crate::url::resolve_in_scope;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// What a worker thread did during the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub id: usize,
    /// False if the worker exited because it could not build a fetcher
    pub initialized: bool,
    /// URLs this worker claimed and processed
    pub pages: usize,
}

/// Runs one worker until the frontier hands it `Next::Stop`
///
/// A worker that cannot build its fetcher returns immediately without
/// touching the frontier or the active-worker counter.
pub fn run_worker(
    id: usize,
    ctx: &CrawlContext,
    fetchers: &dyn FetcherFactory,
    extractor: &dyn LinkExtractor,
) -> WorkerSummary {
    let _registered = ctx.enter_worker();

    let fetcher = match fetchers.create(id) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("Worker [{}] failed to initialize fetcher: {}", id, e);
            ctx.record_worker_failure();
            return WorkerSummary {
                id,
                initialized: false,
                pages: 0,
            };
        }
    };

    ctx.record_worker_started();
    tracing::debug!("Worker [{}] started", id);
    let mut pages = 0;

    loop {
        let url = match ctx.frontier().pop() {
            Next::Url(url) => url,
            Next::Stop => break,
        };

        if !ctx.visited().check_and_insert(&url) {
            tracing::trace!("Worker [{}] skipping already visited: {}", id, url);
            continue;
        }

        let outcome = {
            let _active = ctx.begin_active();
            panic::catch_unwind(AssertUnwindSafe(|| {
                process_url(id, ctx, fetcher.as_ref(), extractor, &url)
            }))
            .unwrap_or_else(|payload| {
                let error = panic_message(payload.as_ref());
                tracing::error!("Worker [{}] panicked on {}: {}", id, url, error);
                PageOutcome::Panicked { error }
            })
        };

        tracing::debug!("Worker [{}] {}: {}", id, url, outcome);
        ctx.stats().record(&outcome);
        pages += 1;
    }

    tracing::debug!("Worker [{}] finished after {} pages", id, pages);
    WorkerSummary {
        id,
        initialized: true,
        pages,
    }
}

/// Fetches one claimed URL and pushes its in-scope links
///
/// Every push happens before this returns, and so before the caller's
/// active guard is released.
fn process_url(
    id: usize,
    ctx: &CrawlContext,
    fetcher: &dyn Fetcher,
    extractor: &dyn LinkExtractor,
    url: &str,
) -> PageOutcome {
    tracing::trace!(
        "Worker [{}] fetching: {} (visited: {})",
        id,
        url,
        ctx.visited().len()
    );

    let response = match fetcher.fetch(url) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Worker [{}] fetch failed for {}: {}", id, url, e);
            return PageOutcome::TransportError {
                error: e.to_string(),
            };
        }
    };

    if response.final_url != url {
        tracing::debug!(
            "Worker [{}] {} redirected to {}",
            id,
            url,
            response.final_url
        );
    }

    if !response.is_success() {
        return PageOutcome::HttpError {
            status_code: response.status_code,
        };
    }

    if !response.is_html() {
        return PageOutcome::NotHtml {
            content_type: response.content_type,
        };
    }

    let hrefs = match extractor.extract(&response.body) {
        Ok(hrefs) => hrefs,
        Err(e) => {
            tracing::warn!("Worker [{}] failed to parse {}: {}", id, url, e);
            return PageOutcome::ParseError {
                error: e.to_string(),
            };
        }
    };

    let mut links_enqueued = 0;
    for href in &hrefs {
        if let Some(link) = resolve_in_scope(url, href, ctx.scope()) {
            ctx.frontier().push(link);
            links_enqueued += 1;
        }
    }

    PageOutcome::Processed {
        links_found: hrefs.len(),
        links_enqueued,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
