//! The presenter's view of the application.
//!
//! [`App`] is a render-ready copy of the engine's state, kept current by
//! [`App::apply`], which the engine calls for every state change.  It also
//! holds what only the UI cares about: the text being typed, which pane has
//! focus and the post-list selection.
//!
//! The engine never reads `App`, and `App` never calls the engine: key
//! handling turns into [`crate::input::Action`]s that `main` forwards.

use ratatui::widgets::ListState;

use crate::error::Feedback;
use crate::source::{Feed, Post};
use crate::state::{AddFeedStatus, Change, StatePath, Value};

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The feed URL text field.
    Input,
    /// The post list.
    Posts,
}

pub struct App {
    /// Subscribed feeds, in subscription order.
    pub feeds: Vec<Feed>,
    /// Known posts, in merge order.
    pub posts: Vec<Post>,
    /// The post shown in the detail popup.
    pub detail: Option<Post>,
    pub feedback: Option<Feedback>,
    pub status: AddFeedStatus,
    /// Text in the feed URL field.
    pub input: String,
    pub focus: Focus,
    /// Selection in the post list.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            feeds: Vec::new(),
            posts: Vec::new(),
            detail: None,
            feedback: None,
            status: AddFeedStatus::Ready,
            input: String::new(),
            focus: Focus::Input,
            list_state: ListState::default(),
            quit: false,
        }
    }

    /// Bring the view up to date with one state change.
    pub fn apply(&mut self, change: &Change<'_>) {
        match (change.value, change.previous) {
            // Both collections are append-only, so the previous value is a
            // prefix of the new one.
            (Value::Feeds(all), Value::Feeds(before)) => {
                self.feeds.extend_from_slice(&all[before.len()..]);
            }
            (Value::Posts(all), Value::Posts(before)) => {
                self.posts.extend_from_slice(&all[before.len()..]);
                if self.list_state.selected().is_none() && !self.posts.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            (Value::Seen(seen), _) => {
                if let StatePath::PostSeen(index) = change.path {
                    if let Some(post) = self.posts.get_mut(index) {
                        post.seen = seen;
                        if let Some(detail) = self.detail.as_mut().filter(|d| d.guid == post.guid) {
                            detail.seen = seen;
                        }
                    }
                }
            }
            (Value::Guid(guid), _) => {
                self.detail = guid.and_then(|g| self.posts.iter().find(|p| p.guid == g).cloned());
            }
            (Value::Feedback(feedback), _) => self.feedback = feedback,
            (Value::Status(status), Value::Status(previous)) => {
                self.status = status;
                // A feed was added: the field is ready for the next one.
                if previous == AddFeedStatus::Sending && status == AddFeedStatus::Ready {
                    self.input.clear();
                }
            }
            _ => {}
        }
    }

    // -- derived values ------------------------------------------------------

    pub fn unread_count(&self) -> usize {
        self.posts.iter().filter(|p| !p.seen).count()
    }

    /// Guid of the selected post.
    pub fn selected_guid(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.posts.get(i))
            .map(|p| p.guid.as_str())
    }

    /// Title of the feed a post came from.
    pub fn feed_title<'a>(&'a self, feed_url: &'a str) -> &'a str {
        self.feeds
            .iter()
            .find(|f| f.url == feed_url)
            .map(|f| f.title.as_str())
            .unwrap_or(feed_url)
    }

    /// Whether the URL field accepts edits.  Read-only while a submission
    /// is being sent.
    pub fn input_enabled(&self) -> bool {
        self.status != AddFeedStatus::Sending
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.posts.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.posts.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.posts.is_empty() {
            self.list_state.select(Some(self.posts.len() - 1));
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Posts,
            Focus::Posts => Focus::Input,
        };
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
