//! Error types for the playback, quiz, and session layers.
//!
//! Engines return these as values. Only the session controller turns them
//! into a user-visible message.

use thiserror::Error;

/// Errors reported by the playback scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// `start` was called with no words loaded.
    #[error("no text loaded")]
    NoTextLoaded,

    /// Commands that spawn the tick loop need a Tokio runtime.
    #[error("no Tokio runtime available to drive playback")]
    NoRuntime,
}

/// Errors reported by the quiz engine. These never reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The question or option index does not exist.
    #[error("invalid answer index: question {question}, option {option}")]
    InvalidAnswerIndex { question: usize, option: usize },

    /// The question already has an answer; the first one is final.
    #[error("question {0} already answered")]
    DuplicateAnswer(usize),

    /// The quiz has already been scored.
    #[error("quiz already completed")]
    AlreadyCompleted,

    /// There is no quiz to answer.
    #[error("no active quiz")]
    NotActive,
}

/// User-visible session errors, reported through the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Start was requested before any text was loaded.
    #[error("please generate a text or add your own text first")]
    NoTextLoaded,

    /// The content provider failed to produce a paragraph.
    #[error("failed to generate text: {0}")]
    ContentGenerationFailure(String),

    /// Any other playback failure.
    #[error(transparent)]
    Playback(PlaybackError),
}

impl From<PlaybackError> for SessionError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::NoTextLoaded => SessionError::NoTextLoaded,
            other => SessionError::Playback(other),
        }
    }
}
