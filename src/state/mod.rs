//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: What happened to a claimed URL (processed, HTTP error, not HTML, etc.)
//! - `OutcomeKind`: Payload-free outcome category used for counting

mod page_outcome;

// Re-export main types
pub use page_outcome::{OutcomeKind, PageOutcome};
