//! Per-run shared state
//!
//! One `CrawlContext` is built for each crawl and borrowed by every worker
//! and the monitor. Nothing in it outlives the run.

use crate::crawler::frontier::Frontier;
use crate::crawler::visited::VisitedSet;
use crate::output::StatsRecorder;
use crate::url::DomainScope;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared state of one crawl run
#[derive(Debug)]
pub struct CrawlContext {
    frontier: Frontier,
    visited: VisitedSet,
    scope: DomainScope,
    stats: StatsRecorder,

    /// Workers between a successful claim and the end of its link pushes
    active: AtomicUsize,

    /// Workers whose thread function has not returned yet
    remaining: AtomicUsize,

    /// Workers that built a fetcher and entered their loop
    started: AtomicUsize,

    /// Workers that could not build a fetcher
    failed: AtomicUsize,

    stop_requests: AtomicUsize,
}

impl CrawlContext {
    /// Creates the context for a pool of `workers` threads
    pub fn new(scope: DomainScope, workers: usize) -> Self {
        Self {
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            scope,
            stats: StatsRecorder::new(),
            active: AtomicUsize::new(0),
            remaining: AtomicUsize::new(workers),
            started: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            stop_requests: AtomicUsize::new(0),
        }
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }

    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    /// Marks the calling worker active until the guard is dropped
    pub fn begin_active(&self) -> ActiveGuard<'_> {
        self.active.fetch_add(1, Ordering::SeqCst);
        ActiveGuard {
            counter: &self.active,
        }
    }

    pub fn active_workers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Registers a running worker thread; dropping the guard marks it exited
    pub fn enter_worker(&self) -> WorkerGuard<'_> {
        WorkerGuard {
            remaining: &self.remaining,
        }
    }

    /// Worker threads that have not exited yet
    pub fn workers_remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn record_worker_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    /// Workers that got past initialization, whether or not they later exited
    pub fn workers_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn record_worker_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn workers_failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Broadcasts stop to every worker blocked on the frontier
    pub fn request_stop(&self) {
        self.stop_requests.fetch_add(1, Ordering::SeqCst);
        self.frontier.request_stop();
    }

    pub fn stop_requests(&self) -> usize {
        self.stop_requests.load(Ordering::SeqCst)
    }
}

/// Holds one unit of the active-worker counter
///
/// The decrement runs on drop, so it also happens if fetching or extraction
/// panics.
#[derive(Debug)]
pub struct ActiveGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Decrements the remaining-workers count when a worker thread returns
#[derive(Debug)]
pub struct WorkerGuard<'a> {
    remaining: &'a AtomicUsize,
}

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.remaining.fetch_sub(1, Ordering::SeqCst);
    }
}
