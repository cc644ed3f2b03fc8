//! Termination monitor
//!
//! Polls the frontier and the active-worker counter on a fixed interval and
//! broadcasts stop once both read idle. New frontier entries are only pushed
//! by an active worker before it releases its active guard, so an empty
//! queue with zero active workers cannot be left by any later push.
//!
//! The two reads are not one atomic snapshot. A worker that has popped the
//! last URL but not yet claimed it can be missed; it then drains whatever it
//! discovers itself, because `pop` keeps handing out URLs after a stop.

use crate::crawler::context::CrawlContext;
use std::thread;
use std::time::Duration;

/// Why the monitor returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The frontier was empty with no active worker
    Idle { polls: u32 },

    /// Every worker exited before the crawl went idle
    NoWorkers { polls: u32 },
}

impl MonitorOutcome {
    pub fn polls(&self) -> u32 {
        match self {
            Self::Idle { polls } | Self::NoWorkers { polls } => *polls,
        }
    }
}

/// Polls until the crawl is idle, then requests stop exactly once
pub fn run_monitor(ctx: &CrawlContext, poll_interval: Duration) -> MonitorOutcome {
    let mut polls = 0u32;

    loop {
        thread::sleep(poll_interval);
        polls += 1;

        let queue_empty = ctx.frontier().is_empty();
        let active = ctx.active_workers();

        tracing::debug!(
            "Monitoring: queue empty? {}, queued: {}, active workers: {}, visited: {}",
            if queue_empty { "yes" } else { "no" },
            ctx.frontier().len(),
            active,
            ctx.visited().len()
        );

        if queue_empty && active == 0 {
            tracing::info!(
                "Queue empty and workers idle after {} polls, requesting stop",
                polls
            );
            ctx.request_stop();
            return MonitorOutcome::Idle { polls };
        }

        if ctx.workers_remaining() == 0 {
            tracing::error!("All workers exited before the crawl went idle");
            ctx.request_stop();
            return MonitorOutcome::NoWorkers { polls };
        }

        if polls % 5 == 0 {
            tracing::info!(
                "Progress: {} pages visited, {} queued, {} active workers",
                ctx.visited().len(),
                ctx.frontier().len(),
                active
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::{DomainScope, ScopeMode};
    use std::time::Instant;

    const TICK: Duration = Duration::from_millis(10);

    fn context(workers: usize) -> CrawlContext {
        let scope = DomainScope::from_seed("https://example.com/", ScopeMode::Prefix).unwrap();
        CrawlContext::new(scope, workers)
    }

    #[test]
    fn test_idle_on_first_poll() {
        let ctx = context(1);
        let outcome = run_monitor(&ctx, TICK);

        assert_eq!(outcome, MonitorOutcome::Idle { polls: 1 });
        assert_eq!(ctx.stop_requests(), 1);
        assert!(ctx.frontier().is_stop_requested());
    }

    #[test]
    fn test_waits_while_worker_active() {
        let ctx = context(1);
        let _registered = ctx.enter_worker();

        let outcome = thread::scope(|s| {
            let guard = ctx.begin_active();
            let monitor = s.spawn(|| run_monitor(&ctx, TICK));

            thread::sleep(Duration::from_millis(100));
            assert_eq!(ctx.stop_requests(), 0);
            drop(guard);

            monitor.join().unwrap()
        });

        assert!(matches!(outcome, MonitorOutcome::Idle { polls } if polls >= 2));
        assert_eq!(ctx.stop_requests(), 1);
    }

    #[test]
    fn test_waits_while_queue_non_empty() {
        let ctx = context(1);
        let _registered = ctx.enter_worker();
        ctx.frontier().push("https://example.com/".to_string());

        let started = Instant::now();
        let outcome = thread::scope(|s| {
            let monitor = s.spawn(|| run_monitor(&ctx, TICK));

            thread::sleep(Duration::from_millis(80));
            assert_eq!(ctx.stop_requests(), 0);

            // Stand in for a worker taking the URL
            let _ = ctx.frontier().pop();

            monitor.join().unwrap()
        });

        assert!(matches!(outcome, MonitorOutcome::Idle { .. }));
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_no_workers_left() {
        let ctx = context(2);
        ctx.frontier().push("https://example.com/".to_string());
        drop(ctx.enter_worker());
        drop(ctx.enter_worker());

        let outcome = run_monitor(&ctx, TICK);

        assert_eq!(outcome, MonitorOutcome::NoWorkers { polls: 1 });
        assert_eq!(ctx.stop_requests(), 1);
    }
}
