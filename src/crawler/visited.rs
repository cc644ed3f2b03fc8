//! Visited set: at-most-once claim of every URL

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe set of URLs that have been claimed for fetching
///
/// Membership is only exposed through [`VisitedSet::check_and_insert`]; a
/// separate check followed by an insert is not atomic.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `url` if absent
    ///
    /// Returns true only for the call that performed the insertion.
    pub fn check_and_insert(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sorted copy of every claimed URL
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_first_insert_wins() {
        let visited = VisitedSet::new();
        assert!(visited.check_and_insert("https://example.com/"));
        assert!(!visited.check_and_insert("https://example.com/"));
        assert!(visited.check_and_insert("https://example.com/other"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let visited = VisitedSet::new();
        visited.check_and_insert("https://example.com/c");
        visited.check_and_insert("https://example.com/a");
        visited.check_and_insert("https://example.com/b");

        assert_eq!(
            visited.snapshot(),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
                "https://example.com/c".to_string(),
            ]
        );
    }

    #[test]
    fn test_concurrent_claims_exactly_one_winner() {
        const THREADS: usize = 16;

        for round in 0..20 {
            let visited = VisitedSet::new();
            let barrier = Barrier::new(THREADS);
            let winners = AtomicUsize::new(0);
            let url = format!("https://example.com/page-{}", round);

            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        barrier.wait();
                        if visited.check_and_insert(&url) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });

            assert_eq!(winners.load(Ordering::SeqCst), 1);
            assert_eq!(visited.len(), 1);
        }
    }
}
