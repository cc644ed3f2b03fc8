//! Configuration module for Tidewalk
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags override whatever it sets.
//!
//! # Example
//!
//! ```no_run
//! use tidewalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tidewalk.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_WORKERS};
