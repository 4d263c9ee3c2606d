//! Command-line configuration.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::source::DEFAULT_PROXY;

/// A live-updating RSS reader for the terminal
#[derive(Parser, Debug)]
#[command(name = "livescroll-reader", version)]
#[command(about = "Subscribe to RSS feeds and watch new posts arrive", long_about = None)]
pub struct Config {
    /// Feed URLs to subscribe to at startup
    #[arg(value_name = "FEED")]
    pub feeds: Vec<String>,

    /// Read-through proxy every feed request is routed through
    #[arg(long, default_value = DEFAULT_PROXY)]
    pub proxy: Url,

    /// Delay between the end of one polling cycle and the start of the next
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,

    /// File the log is written to (the terminal belongs to the UI)
    #[arg(long, default_value = "livescroll-reader.log")]
    pub log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Feed URLs to submit at startup, trimmed the same way as typed input.
    pub fn startup_feeds(&self) -> VecDeque<String> {
        self.feeds.iter().map(|url| url.trim().to_string()).collect()
    }
}
