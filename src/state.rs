//! The observable application state.
//!
//! [`StateStore`] owns the single [`AppState`] for the session.  State can
//! only be changed through the store's setters; each setter performs one
//! field write and then synchronously calls every subscribed observer with
//! a [`Change`] naming the field, its new value and its previous value.
//!
//! A logical operation is usually several writes (a successful load writes
//! `feeds`, then `posts`, then `feedback`, then `addFeedStatus`) and
//! observers hear about each one as it happens.  Every field is consistent
//! on its own at each notification; the set of fields may be mid-update.
//!
//! Writing a value equal to the current one is not a change and notifies
//! nobody.

use std::collections::HashMap;
use std::fmt;

use crate::error::Feedback;
use crate::source::{Feed, Post};

/// Where the add-feed form is in its lifecycle.
///
/// `Ready → Processing → Sending → {Ready, Error}`, or
/// `Processing → Error` when validation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddFeedStatus {
    #[default]
    Ready,
    Processing,
    Sending,
    Error,
}

impl fmt::Display for AddFeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddFeedStatus::Ready => "ready",
            AddFeedStatus::Processing => "processing",
            AddFeedStatus::Sending => "sending",
            AddFeedStatus::Error => "error",
        })
    }
}

/// Everything the UI renders.  Lives for one run of the program.
#[derive(Debug, Default)]
pub struct AppState {
    /// Subscribed feeds, in subscription order.  Append-only.
    pub feeds: Vec<Feed>,
    /// Known posts, in the order they were merged.  Append-only.
    pub posts: Vec<Post>,
    /// The post shown in the detail view, if any.
    pub current_guid: Option<String>,
    pub feedback: Option<Feedback>,
    pub add_feed_status: AddFeedStatus,
}

/// Identifies the field a [`Change`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatePath {
    Feeds,
    Posts,
    /// The `seen` flag of the post at this index in [`AppState::posts`].
    PostSeen(usize),
    CurrentGuid,
    Feedback,
    AddFeedStatus,
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatePath::Feeds => f.write_str("feeds"),
            StatePath::Posts => f.write_str("posts"),
            StatePath::PostSeen(index) => write!(f, "posts.{index}.seen"),
            StatePath::CurrentGuid => f.write_str("currentGuid"),
            StatePath::Feedback => f.write_str("feedback"),
            StatePath::AddFeedStatus => f.write_str("addFeedStatus"),
        }
    }
}

/// A field value, borrowed from the store for the duration of a
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Feeds(&'a [Feed]),
    Posts(&'a [Post]),
    Seen(bool),
    Guid(Option<&'a str>),
    Feedback(Option<Feedback>),
    Status(AddFeedStatus),
}

/// One field write, as seen by an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<'a> {
    pub path: StatePath,
    pub value: Value<'a>,
    pub previous: Value<'a>,
}

/// A subscriber to state changes.
pub type Observer = Box<dyn FnMut(&Change<'_>)>;

/// Owner of the [`AppState`] and its observers.
pub struct StateStore {
    state: AppState,
    observers: Vec<Observer>,
    /// guid → index into `state.posts`.
    post_index: HashMap<String, usize>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            state: AppState::default(),
            observers: Vec::new(),
            post_index: HashMap::new(),
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Register an observer.  Observers are called in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&Change<'_>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Whether a post with this guid is already known.
    pub fn contains_post(&self, guid: &str) -> bool {
        self.post_index.contains_key(guid)
    }

    /// Index of the post with this guid in [`AppState::posts`].
    pub fn post_index(&self, guid: &str) -> Option<usize> {
        self.post_index.get(guid).copied()
    }

    pub fn feed_urls(&self) -> Vec<String> {
        self.state.feeds.iter().map(|f| f.url.clone()).collect()
    }

    // -- setters -------------------------------------------------------------

    pub fn push_feed(&mut self, feed: Feed) {
        let previous_len = self.state.feeds.len();
        self.state.feeds.push(feed);

        let feeds = &self.state.feeds;
        emit(
            &mut self.observers,
            &Change {
                path: StatePath::Feeds,
                value: Value::Feeds(feeds),
                previous: Value::Feeds(&feeds[..previous_len]),
            },
        );
    }

    /// Append posts in the given order.  The caller guarantees their guids
    /// are new; an empty batch is not a write.
    pub fn extend_posts(&mut self, posts: Vec<Post>) {
        if posts.is_empty() {
            return;
        }
        let previous_len = self.state.posts.len();
        for (offset, post) in posts.iter().enumerate() {
            self.post_index.insert(post.guid.clone(), previous_len + offset);
        }
        self.state.posts.extend(posts);

        let all = &self.state.posts;
        emit(
            &mut self.observers,
            &Change {
                path: StatePath::Posts,
                value: Value::Posts(all),
                previous: Value::Posts(&all[..previous_len]),
            },
        );
    }

    /// Mark the post at `index` as seen.  Out-of-range indices and posts that
    /// are already seen are left alone.
    pub fn set_seen(&mut self, index: usize) {
        let Some(post) = self.state.posts.get_mut(index) else {
            return;
        };
        if post.seen {
            return;
        }
        post.seen = true;
        emit(
            &mut self.observers,
            &Change {
                path: StatePath::PostSeen(index),
                value: Value::Seen(true),
                previous: Value::Seen(false),
            },
        );
    }

    pub fn set_current_guid(&mut self, guid: Option<String>) {
        if self.state.current_guid == guid {
            return;
        }
        let previous = std::mem::replace(&mut self.state.current_guid, guid);
        emit(
            &mut self.observers,
            &Change {
                path: StatePath::CurrentGuid,
                value: Value::Guid(self.state.current_guid.as_deref()),
                previous: Value::Guid(previous.as_deref()),
            },
        );
    }

    pub fn set_feedback(&mut self, feedback: Option<Feedback>) {
        let previous = self.state.feedback;
        if previous == feedback {
            return;
        }
        self.state.feedback = feedback;
        emit(
            &mut self.observers,
            &Change {
                path: StatePath::Feedback,
                value: Value::Feedback(feedback),
                previous: Value::Feedback(previous),
            },
        );
    }

    pub fn set_status(&mut self, status: AddFeedStatus) {
        let previous = self.state.add_feed_status;
        if previous == status {
            return;
        }
        self.state.add_feed_status = status;
        emit(
            &mut self.observers,
            &Change {
                path: StatePath::AddFeedStatus,
                value: Value::Status(status),
                previous: Value::Status(previous),
            },
        );
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn emit(observers: &mut [Observer], change: &Change<'_>) {
    for observer in observers.iter_mut() {
        observer(change);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
