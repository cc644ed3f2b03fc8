//! Output module for reporting crawl results
//!
//! This module handles:
//! - Recording per-outcome crawl statistics while workers run
//! - Printing the statistics and the visited URL list at the end of a run

pub mod stats;

pub use stats::{print_statistics, write_statistics, CrawlStatistics, StatsRecorder};

use std::io::{self, Write};

/// Writes one visited URL per line
pub fn write_visited<W: Write>(out: &mut W, urls: &[String]) -> io::Result<()> {
    for url in urls {
        writeln!(out, "{}", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_visited() {
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.com/a".to_string(),
        ];
        let mut out = Vec::new();
        write_visited(&mut out, &urls).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "https://example.com/\nhttps://example.com/a\n"
        );
    }
}
