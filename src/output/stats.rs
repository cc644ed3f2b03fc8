//! Statistics gathered while a crawl runs
//!
//! Workers record one outcome per claimed URL into a shared
//! [`StatsRecorder`]; the engine takes a [`CrawlStatistics`] snapshot once
//! every worker has joined.

use crate::state::{OutcomeKind, PageOutcome};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of URLs claimed and attempted
    pub total_pages: u64,

    /// Count of pages by outcome
    pub pages_by_outcome: BTreeMap<OutcomeKind, u64>,

    /// Hrefs returned by the link extractor, across all pages
    pub links_found: u64,

    /// In-scope links pushed to the frontier, across all pages
    pub links_enqueued: u64,

    /// Non-2xx status codes and how often each was seen
    pub error_statuses: BTreeMap<u16, u64>,
}

impl CrawlStatistics {
    pub fn count(&self, kind: OutcomeKind) -> u64 {
        self.pages_by_outcome.get(&kind).copied().unwrap_or(0)
    }

    /// Pages that failed outright, as opposed to being skipped by status or
    /// content type
    pub fn failed_pages(&self) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(kind, _)| kind.is_error())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Concurrent recorder shared by every worker of a run
#[derive(Debug, Default)]
pub struct StatsRecorder {
    by_kind: [AtomicU64; OutcomeKind::ALL.len()],
    links_found: AtomicU64,
    links_enqueued: AtomicU64,
    error_statuses: Mutex<BTreeMap<u16, u64>>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    // OutcomeKind discriminants are 0..ALL.len() in declaration order
    fn slot(kind: OutcomeKind) -> usize {
        kind as usize
    }

    /// Records the outcome of one claimed URL
    pub fn record(&self, outcome: &PageOutcome) {
        self.by_kind[Self::slot(outcome.kind())].fetch_add(1, Ordering::Relaxed);

        match outcome {
            PageOutcome::Processed {
                links_found,
                links_enqueued,
            } => {
                self.links_found
                    .fetch_add(*links_found as u64, Ordering::Relaxed);
                self.links_enqueued
                    .fetch_add(*links_enqueued as u64, Ordering::Relaxed);
            }
            PageOutcome::HttpError { status_code } => {
                let mut statuses = self
                    .error_statuses
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                *statuses.entry(*status_code).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    /// Takes a consistent-enough snapshot; exact once all workers have joined
    pub fn snapshot(&self) -> CrawlStatistics {
        let mut pages_by_outcome = BTreeMap::new();
        let mut total_pages = 0;

        for kind in OutcomeKind::ALL {
            let count = self.by_kind[Self::slot(kind)].load(Ordering::Relaxed);
            total_pages += count;
            if count > 0 {
                pages_by_outcome.insert(kind, count);
            }
        }

        CrawlStatistics {
            total_pages,
            pages_by_outcome,
            links_found: self.links_found.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
            error_statuses: self
                .error_statuses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

/// Writes statistics in a human-readable layout
pub fn write_statistics<W: Write>(out: &mut W, stats: &CrawlStatistics) -> io::Result<()> {
    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages attempted: {}", stats.total_pages)?;
    writeln!(out, "  Pages failed: {}", stats.failed_pages())?;
    writeln!(out, "  Links found: {}", stats.links_found)?;
    writeln!(out, "  Links enqueued (in scope): {}", stats.links_enqueued)?;
    writeln!(out)?;

    writeln!(out, "Pages by Outcome:")?;
    // Sort outcomes by count (descending)
    let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (kind, count) in outcome_counts {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        writeln!(out, "  {}: {} ({:.1}%)", kind, count, percentage)?;
    }
    writeln!(out)?;

    if !stats.error_statuses.is_empty() {
        writeln!(out, "HTTP Error Statuses:")?;
        for (status, count) in &stats.error_statuses {
            writeln!(out, "  {}: {}", status, count)?;
        }
        writeln!(out)?;
    }

    let processed = stats.count(OutcomeKind::Processed);
    let success_rate = if stats.total_pages > 0 {
        (processed as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        success_rate, processed, stats.total_pages
    )
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write_statistics(&mut handle, stats) {
        tracing::warn!("Failed to write statistics: {}", e);
    }
}
