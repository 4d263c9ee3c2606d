//! Error taxonomy and the user-facing feedback it maps to.
//!
//! | Error | Raised by | Reaches the user? |
//! |---|---|---|
//! | [`ValidationError`] | [`crate::validate`] | yes, from `add_feed` |
//! | [`NetworkError`] | [`crate::source::FeedFetcher`] | from `add_feed` only |
//! | [`ParseError`] | [`crate::source::FeedParser`] | from `add_feed` only |
//! | [`LoadError::Unexpected`] | a panicking load task | from `add_feed` only |
//!
//! Poll failures are logged and dropped by the engine; none of these errors
//! is ever fatal to the process.

use std::fmt;

use thiserror::Error;

pub use crate::validate::ValidationError;

/// Transport or proxy failure while fetching a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("network error: {0}")]
pub struct NetworkError(pub String);

/// The fetched document is not a readable feed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("feed parse error: {0}")]
pub struct ParseError(pub String);

/// Why loading (fetch + parse) a feed failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Anything else, e.g. a panic inside the load task.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// `mark_seen` was given a guid that is not in the post collection.
///
/// Guids reach the engine only from posts the UI has rendered, so this
/// indicates a bug in the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no post with guid {0:?}")]
pub struct UnknownPost(pub String);

/// The single user-facing status message, overwritten by every outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// A submitted feed is being fetched.
    Loading,
    /// A submitted feed was added.
    Success,
    /// The submitted URL was rejected before any request was made.
    Invalid(ValidationError),
    Network,
    Parse,
    Unexpected,
}

impl Feedback {
    /// Whether this message reports a failure.
    pub fn is_error(&self) -> bool {
        !matches!(self, Feedback::Loading | Feedback::Success)
    }
}

impl From<&LoadError> for Feedback {
    fn from(err: &LoadError) -> Self {
        match err {
            LoadError::Network(_) => Feedback::Network,
            LoadError::Parse(_) => Feedback::Parse,
            LoadError::Unexpected(_) => Feedback::Unexpected,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Loading => f.write_str("Loading…"),
            Feedback::Success => f.write_str("RSS feed loaded successfully"),
            Feedback::Invalid(err) => write!(f, "{err}"),
            Feedback::Network => f.write_str("Network error, please try again"),
            Feedback::Parse => f.write_str("The resource does not contain a valid RSS feed"),
            Feedback::Unexpected => f.write_str("Something went wrong, please try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_map_to_distinct_feedback() {
        let network = LoadError::from(NetworkError("timeout".into()));
        let parse = LoadError::from(ParseError("bad xml".into()));
        let other = LoadError::Unexpected("boom".into());

        assert_eq!(Feedback::from(&network), Feedback::Network);
        assert_eq!(Feedback::from(&parse), Feedback::Parse);
        assert_eq!(Feedback::from(&other), Feedback::Unexpected);
    }

    #[test]
    fn load_error_display_is_transparent() {
        let err = LoadError::from(NetworkError("dns failure".into()));
        assert_eq!(err.to_string(), "network error: dns failure");
    }

    #[test]
    fn only_loading_and_success_are_not_errors() {
        assert!(!Feedback::Loading.is_error());
        assert!(!Feedback::Success.is_error());
        assert!(Feedback::Network.is_error());
        assert!(Feedback::Invalid(ValidationError::Duplicate).is_error());
    }

    #[test]
    fn validation_feedback_uses_validation_message() {
        let feedback = Feedback::Invalid(ValidationError::Duplicate);
        assert_eq!(feedback.to_string(), ValidationError::Duplicate.to_string());
    }
}
