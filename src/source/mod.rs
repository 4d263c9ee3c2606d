//! Where feed documents come from and how they are read.
//!
//! Loading a feed is two independent steps, each behind a trait so the engine
//! can be driven by test doubles:
//!
//! * [`FeedFetcher`] retrieves the raw document text for a URL
//!   ([`ProxyFetcher`] in production).
//! * [`FeedParser`] turns that text into a [`ParsedFeed`]
//!   ([`RssParser`] in production).
//!
//! [`FeedLoader`] runs the two in sequence and folds their errors into a
//! [`LoadError`].
//!
//! ## For contributors — supporting another format
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Implement [`FeedParser`] for your parser struct.
//! 3. Add `mod atom;` below and re-export the struct.
//! 4. Pass it to [`crate::engine::Engine::new`] in `main.rs`.

mod feed;
mod proxy;
mod rss;

pub use feed::{Feed, ParsedFeed, ParsedPost, Post};
pub use proxy::{ProxyFetcher, DEFAULT_PROXY};
pub use rss::RssParser;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;

use crate::error::{LoadError, NetworkError, ParseError};

/// Retrieves the raw text of a feed document.
///
/// Loads and polls run in spawned tasks, so implementations must be
/// `Send + Sync`.  Fetches for different URLs may be in flight at once.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError>;
}

/// Converts raw document text into a [`ParsedFeed`].
///
/// Must fail with [`ParseError`] for anything that is not a feed, so the
/// user sees a parse message rather than a network one.
pub trait FeedParser: Send + Sync {
    fn parse(&self, document: &str) -> Result<ParsedFeed, ParseError>;
}

/// Fetch-then-parse for one URL, shared by submissions and polls.
///
/// Cheap to clone; each spawned load task gets its own copy.
#[derive(Clone)]
pub struct FeedLoader {
    fetcher: Arc<dyn FeedFetcher>,
    parser: Arc<dyn FeedParser>,
}

impl FeedLoader {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, parser: Arc<dyn FeedParser>) -> Self {
        Self { fetcher, parser }
    }

    /// Fetch and parse `url`.
    ///
    /// A panic in the fetcher or parser is caught and reported as
    /// [`LoadError::Unexpected`], so every load produces an outcome.
    pub async fn load(&self, url: &str) -> Result<ParsedFeed, LoadError> {
        let attempt = async {
            let document = self.fetcher.fetch(url).await?;
            Ok::<_, LoadError>(self.parser.parse(&document)?)
        };

        match AssertUnwindSafe(attempt).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => Err(LoadError::Unexpected(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "load task panicked".to_string()
    }
}
