//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier queue and visited set
//! - HTTP fetching and HTML link extraction behind swappable traits
//! - The worker loop and the termination monitor
//! - Overall crawl coordination

mod context;
mod engine;
mod fetcher;
mod frontier;
mod monitor;
mod parser;
mod visited;
mod worker;

pub use context::{ActiveGuard, CrawlContext, WorkerGuard};
pub use engine::{run_crawl, CrawlEngine, CrawlReport, EngineSettings};
pub use fetcher::{
    build_http_client, FetchResponse, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory,
};
pub use frontier::{Frontier, Next};
pub use monitor::{run_monitor, MonitorOutcome};
pub use parser::{HtmlLinkExtractor, LinkExtractor};
pub use visited::VisitedSet;
pub use worker::{run_worker, WorkerSummary};
