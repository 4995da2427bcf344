//! Content error types.

use thiserror::Error;

/// Errors a content provider can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The requested topic was empty or whitespace.
    #[error("topic must not be empty")]
    EmptyTopic,

    /// The provider could not produce a paragraph.
    #[error("content unavailable: {0}")]
    Unavailable(String),
}
