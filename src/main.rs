//! Tidewalk main entry point
//!
//! This is the command-line interface for the Tidewalk same-domain crawler.

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tidewalk::config::{load_config_with_hash, validate, Config, MAX_WORKERS};
use tidewalk::output::{print_statistics, write_visited};
use tidewalk::{CrawlEngine, CrawlReport, ScopeMode};
use tracing_subscriber::EnvFilter;

/// Tidewalk: a bounded, multi-threaded same-domain crawler
///
/// Tidewalk starts at START_URL, follows every link that stays on the same
/// domain with a fixed pool of worker threads, and exits once no work is
/// left.
#[derive(Parser, Debug)]
#[command(name = "tidewalk")]
#[command(version)]
#[command(about = "A bounded, multi-threaded same-domain crawler", long_about = None)]
struct Cli {
    /// Seed URL; its scheme and authority define the crawl's domain
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Number of worker threads, 1 to 256 (default: from config, 4)
    #[arg(
        value_name = "WORKERS",
        value_parser = clap::value_parser!(u16).range(1..=MAX_WORKERS as i64)
    )]
    workers: Option<u16>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Interval between termination checks, in milliseconds
    #[arg(long, value_name = "MS")]
    poll_interval_ms: Option<u64>,

    /// Match links by parsed host and port instead of by URL prefix
    #[arg(long)]
    strict_scope: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print every visited URL after the crawl
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let report = match run(&config, &cli.start_url) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {:#}", e);
            return Err(e);
        }
    };

    print_report(&report, cli.quiet, cli.list)?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` is honored only when no verbosity flag is given.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tidewalk=info,warn")),
            1 => EnvFilter::new("tidewalk=debug,info"),
            2 => EnvFilter::new("tidewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_file(false)
        .with_writer(io::stderr)
        .init();
}

/// Loads the config file if one was given, then applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = usize::from(workers);
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.crawler.poll_interval_ms = ms;
    }
    if cli.strict_scope {
        config.crawler.scope = ScopeMode::Host;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

fn run(config: &Config, seed: &str) -> anyhow::Result<CrawlReport> {
    let engine = CrawlEngine::from_config(config);
    let report = engine
        .run(seed)
        .with_context(|| format!("crawl of {} did not complete", seed))?;
    Ok(report)
}

fn print_report(report: &CrawlReport, quiet: bool, list: bool) -> anyhow::Result<()> {
    if !quiet {
        print_statistics(&report.statistics);
        println!();
    }

    if list {
        let stdout = io::stdout();
        write_visited(&mut stdout.lock(), &report.visited)
            .context("failed to write visited URLs")?;
        println!();
    }

    println!("Total unique pages visited: {}", report.unique_pages());
    Ok(())
}
