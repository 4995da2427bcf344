//! Collaborator seams for content.
//!
//! The paragraph lookup, the quiz keyword tables, and the feedback messages
//! are all static content. They are injected through these traits so the
//! scheduling and scoring logic never depends on a particular language or
//! table. The `quickread-content` crate ships the default implementations.

use async_trait::async_trait;

use crate::model::{GeneratedText, QuestionCategory};
use crate::quiz::{KeywordTable, QuestionTemplate};
use crate::scoring::{Feedback, FeedbackCategory};

// ---------------------------------------------------------------------------
// Content provider
// ---------------------------------------------------------------------------

/// Produces a paragraph to read for a topic.
///
/// Implementations may be slow; the controller awaits them without holding
/// any lock, so playback timers keep running.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Human-readable provider name (e.g. "static").
    fn name(&self) -> &str;

    /// Look up (or generate) a paragraph for `topic`.
    async fn lookup_paragraph(&self, topic: &str) -> anyhow::Result<GeneratedText>;
}

// ---------------------------------------------------------------------------
// Quiz content
// ---------------------------------------------------------------------------

/// Static tables the quiz generator draws its questions from.
pub trait QuizContent: Send + Sync {
    /// Keyword table that labels the main topic of a text.
    fn topic_labels(&self) -> &KeywordTable;

    /// Keyword table that labels the central idea of a text.
    fn central_ideas(&self) -> &KeywordTable;

    /// Prompt, decoys, and explanation for a question category.
    fn template(&self, category: QuestionCategory) -> &QuestionTemplate;
}

// ---------------------------------------------------------------------------
// Feedback content
// ---------------------------------------------------------------------------

/// Maps a feedback category to its message and suggestions.
pub trait FeedbackContent: Send + Sync {
    fn feedback(&self, category: FeedbackCategory) -> Feedback;
}
