//! The feed and post types shared by the parser, the engine and the UI.
//!
//! A parser produces a [`ParsedFeed`], which knows nothing about where the
//! document came from.  The engine tags it with the subscription URL to get
//! a [`Feed`], and turns each [`ParsedPost`] into a [`Post`] owned by that
//! feed.
//!
//! ## For contributors
//!
//! If a new source format needs extra per-post data, add an `Option` field
//! to both [`ParsedPost`] and [`Post`] and carry it through
//! [`ParsedPost::into_post`].  Nothing else in the engine needs to change.

use chrono::{DateTime, Utc};

/// A subscribed feed, identified by the URL the user subscribed with.
///
/// Created on the first successful load of a new URL and never updated
/// afterwards: polling only looks for new posts.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Feed {
    /// The subscription URL (exactly as submitted).
    pub url: String,

    /// Channel title from the feed document.
    pub title: String,

    /// Channel description from the feed document.
    pub description: String,
}

/// A single entry belonging to a subscribed feed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Post {
    /// Unique identity across all feeds; used for de-duplication.
    pub guid: String,

    /// URL of the [`Feed`] this post was first seen in.
    pub feed_url: String,

    /// Human-readable headline.
    pub title: String,

    /// URL to the full content.  Empty when the source gave none.
    pub link: String,

    /// Summary text.  Empty when the source gave none.
    pub description: String,

    /// Publication timestamp, for display only.
    pub published: Option<DateTime<Utc>>,

    /// Whether the user has opened this post.  Flips to `true` once.
    pub seen: bool,
}

/// Channel-level data produced by a parser, before it is tied to a URL.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ParsedFeed {
    pub title: String,
    pub description: String,
    /// Entries in document order.
    pub posts: Vec<ParsedPost>,
}

/// One entry produced by a parser.  `guid` is always filled in: parsers
/// derive one when the document has none.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedPost {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
}

impl ParsedFeed {
    /// Split into the [`Feed`] for `url` and the feed's parsed posts.
    pub fn into_feed(self, url: &str) -> (Feed, Vec<ParsedPost>) {
        let feed = Feed {
            url: url.to_string(),
            title: self.title,
            description: self.description,
        };
        (feed, self.posts)
    }
}

impl ParsedPost {
    /// Attach this entry to `feed_url` as a new, unseen [`Post`].
    pub fn into_post(self, feed_url: &str) -> Post {
        Post {
            guid: self.guid,
            feed_url: feed_url.to_string(),
            title: self.title,
            link: self.link,
            description: self.description,
            published: self.published,
            seen: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
