//! RSS document parser.
//!
//! Turns the raw text of an RSS 2.0 document into a [`ParsedFeed`] using the
//! [`rss`] crate.  Anything that is not a well-formed RSS channel is rejected
//! with a [`ParseError`], which the engine reports differently from a
//! network failure.
//!
//! ## Post identity
//!
//! Every [`ParsedPost`] leaves this module with a `guid`:
//!
//! 1. the item's `<guid>` element, if present and non-blank;
//! 2. otherwise its `<link>`;
//! 3. otherwise `sha256:` followed by the hex SHA-256 of the title and
//!    description, so that an identical item fetched again maps to the same
//!    identity.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::{FeedParser, ParsedFeed, ParsedPost};
use crate::error::ParseError;

/// Title used for items that have none.
const UNTITLED: &str = "(untitled)";

/// Parser for RSS 2.0 documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssParser;

impl RssParser {
    pub fn new() -> Self {
        Self
    }

    /// Convert an already-parsed [`rss::Channel`] into a [`ParsedFeed`].
    ///
    /// Pure (no I/O), so tests can exercise the mapping directly.
    pub fn parse_channel(channel: &rss::Channel) -> ParsedFeed {
        let posts = channel
            .items()
            .iter()
            .map(|item| {
                let title = item.title().unwrap_or(UNTITLED).to_string();
                let link = item.link().unwrap_or_default().to_string();
                let description = item.description().unwrap_or_default().to_string();

                let guid = item
                    .guid()
                    .map(|g| g.value().trim())
                    .filter(|g| !g.is_empty())
                    .map(String::from)
                    .or_else(|| Some(link.clone()).filter(|l| !l.is_empty()))
                    .unwrap_or_else(|| content_guid(&title, &description));

                // Unparseable dates are dropped rather than failing the item.
                let published = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                ParsedPost {
                    guid,
                    title,
                    link,
                    description,
                    published,
                }
            })
            .collect();

        ParsedFeed {
            title: channel.title().to_string(),
            description: channel.description().to_string(),
            posts,
        }
    }
}

impl FeedParser for RssParser {
    fn parse(&self, document: &str) -> Result<ParsedFeed, ParseError> {
        let channel = rss::Channel::read_from(document.as_bytes())
            .map_err(|e| ParseError(e.to_string()))?;
        Ok(Self::parse_channel(&channel))
    }
}

/// Identity for an item with neither `<guid>` nor `<link>`.
fn content_guid(title: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"\n");
    hasher.update(description.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
