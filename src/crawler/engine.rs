//! Crawl engine: main crawl orchestration
//!
//! One call to [`CrawlEngine::run`] builds a fresh [`CrawlContext`], seeds the
//! frontier, starts the worker pool on scoped threads, runs the termination
//! monitor on the calling thread, and joins everything before returning a
//! [`CrawlReport`].

use crate::config::{Config, CrawlerConfig};
use crate::crawler::context::CrawlContext;
use crate::crawler::fetcher::{FetcherFactory, HttpFetcherFactory};
use crate::crawler::monitor::{run_monitor, MonitorOutcome};
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::worker::{run_worker, WorkerSummary};
use crate::output::CrawlStatistics;
use crate::url::{DomainScope, ScopeMode};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::thread;
use std::time::Duration;

/// Runtime knobs of one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub workers: usize,
    pub poll_interval: Duration,
    pub scope: ScopeMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for EngineSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            workers: config.workers,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            scope: config.scope,
        }
    }
}

/// Result of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,
    /// Every URL a worker claimed, sorted
    pub visited: Vec<String>,
    pub statistics: CrawlStatistics,
    pub workers_configured: usize,
    /// Workers whose thread was spawned and built a fetcher
    pub workers_started: usize,
    pub workers_failed: usize,
    pub monitor_polls: u32,
    pub stop_requests: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn unique_pages(&self) -> usize {
        self.visited.len()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Owns the collaborators of a crawl and runs it
pub struct CrawlEngine<F, E> {
    settings: EngineSettings,
    fetchers: F,
    extractor: E,
}

impl CrawlEngine<HttpFetcherFactory, HtmlLinkExtractor> {
    /// Builds an engine with the HTTP fetcher and the HTML link extractor
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            EngineSettings::from(&config.crawler),
            HttpFetcherFactory::new(config.http.clone(), config.user_agent.clone()),
            HtmlLinkExtractor::new(),
        )
    }
}

impl<F, E> CrawlEngine<F, E>
where
    F: FetcherFactory,
    E: LinkExtractor,
{
    pub fn new(settings: EngineSettings, fetchers: F, extractor: E) -> Self {
        Self {
            settings,
            fetchers,
            extractor,
        }
    }

    /// Crawls every page reachable from `seed` within its domain
    ///
    /// Blocks until the crawl reaches its idle fixed point and every worker
    /// has been joined.
    ///
    /// # Errors
    ///
    /// * `CrawlError::Url` - the seed has no `http`/`https` scheme or no
    ///   authority
    /// * `CrawlError::NoWorkers` - no worker got past initialization
    pub fn run(&self, seed: &str) -> crate::Result<CrawlReport> {
        let scope = DomainScope::from_seed(seed, self.settings.scope)?;
        let workers = self.settings.workers;
        let started_at = Utc::now();

        tracing::info!(
            "Starting crawl of {} with {} workers (scope: {}, origin: {})",
            seed,
            workers,
            scope.mode(),
            scope.origin()
        );

        let ctx = CrawlContext::new(scope, workers);
        ctx.frontier().push(seed.to_string());

        let (outcome, summaries) = thread::scope(|s| {
            let mut handles = Vec::with_capacity(workers);

            for id in 0..workers {
                let ctx = &ctx;
                let fetchers = &self.fetchers;
                let extractor = &self.extractor;

                let spawned = thread::Builder::new()
                    .name(format!("tidewalk-worker-{}", id))
                    .spawn_scoped(s, move || run_worker(id, ctx, fetchers, extractor));

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        tracing::error!("Failed to spawn worker [{}]: {}", id, e);
                        ctx.record_worker_failure();
                        // Keep the remaining count in step with live threads
                        drop(ctx.enter_worker());
                    }
                }
            }

            let outcome = run_monitor(&ctx, self.settings.poll_interval);

            let summaries: Vec<WorkerSummary> = handles
                .into_iter()
                .filter_map(|handle| match handle.join() {
                    Ok(summary) => {
                        tracing::debug!(
                            "Worker [{}] joined after {} pages",
                            summary.id,
                            summary.pages
                        );
                        Some(summary)
                    }
                    Err(_) => {
                        tracing::error!("A worker thread panicked");
                        None
                    }
                })
                .collect();

            (outcome, summaries)
        });

        let workers_started = ctx.workers_started();
        let workers_failed = ctx.workers_failed();

        if let MonitorOutcome::NoWorkers { .. } = outcome {
            if workers_started == 0 {
                return Err(CrawlError::NoWorkers {
                    configured: workers,
                    failed: workers_failed,
                });
            }
            tracing::warn!(
                "Worker pool exited early ({} of {} joined cleanly), report is partial",
                summaries.len(),
                workers_started
            );
        }

        let report = CrawlReport {
            seed: seed.to_string(),
            visited: ctx.visited().snapshot(),
            statistics: ctx.stats().snapshot(),
            workers_configured: workers,
            workers_started,
            workers_failed,
            monitor_polls: outcome.polls(),
            stop_requests: ctx.stop_requests(),
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} unique pages in {}ms ({} of {} workers started)",
            report.unique_pages(),
            report.duration().num_milliseconds(),
            report.workers_started,
            report.workers_configured
        );

        Ok(report)
    }
}

/// Runs a complete crawl with the HTTP stack built from `config`
///
/// # Example
///
/// ```no_run
/// use tidewalk::config::Config;
/// use tidewalk::crawler::run_crawl;
///
/// let report = run_crawl(&Config::default(), "https://example.com/").unwrap();
/// println!("Total unique pages visited: {}", report.unique_pages());
/// ```
pub fn run_crawl(config: &Config, seed: &str) -> crate::Result<CrawlReport> {
    CrawlEngine::from_config(config).run(seed)
}
