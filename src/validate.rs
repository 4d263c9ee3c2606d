//! Validation of a URL the user wants to subscribe to.
//!
//! Every rule is checked and every violation is reported, in rule order, so
//! the caller can show the first one.  Nothing here has side effects.

use thiserror::Error;
use url::Url;

/// A rule a candidate feed URL broke.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,

    #[error("The link must be a valid URL")]
    InvalidUrl,

    #[error("This RSS feed has already been added")]
    Duplicate,
}

/// Check `candidate` against the rules, in order: non-empty, a valid
/// `http`/`https` URL with a host, and not already in `existing` (exact,
/// case-sensitive match).
pub fn validate<S: AsRef<str>>(
    candidate: &str,
    existing: &[S],
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if candidate.trim().is_empty() {
        errors.push(ValidationError::Required);
    }
    if !is_feed_url(candidate) {
        errors.push(ValidationError::InvalidUrl);
    }
    if existing.iter().any(|url| url.as_ref() == candidate) {
        errors.push(ValidationError::Duplicate);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_feed_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
