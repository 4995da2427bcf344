//! Core data model types for quickread.
//!
//! These are the values the scheduler, quiz engine, and controller pass
//! around. All of them are plain data; mutation happens in the engines.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One loaded text together with the live playback position and rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingSession {
    /// Tokenized words. Immutable once loaded.
    pub words: Arc<Vec<String>>,
    /// Index of the next word to reveal (`0..=words.len()`).
    pub cursor: usize,
    /// Reading rate in words per minute.
    pub rate_per_minute: u32,
    /// Whether a tick loop is currently active.
    pub running: bool,
    /// Epoch milliseconds of the first start since load/reset.
    pub started_at_epoch_ms: Option<i64>,
    /// Opaque identifier, regenerated on every load.
    pub session_id: Uuid,
}

impl ReadingSession {
    /// Create a fresh session at cursor 0. The caller is responsible for
    /// passing a rate that is already within bounds.
    pub fn new(words: Vec<String>, rate_per_minute: u32) -> Self {
        Self {
            words: Arc::new(words),
            cursor: 0,
            rate_per_minute,
            running: false,
            started_at_epoch_ms: None,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// `true` once every word has been revealed.
    pub fn is_exhausted(&self) -> bool {
        !self.words.is_empty() && self.cursor >= self.words.len()
    }

    /// The word on display: the last revealed one, or a preview of the
    /// first word before playback begins.
    pub fn current_word(&self) -> Option<&str> {
        let index = self.cursor.saturating_sub(1);
        self.words.get(index).map(String::as_str)
    }

    /// The loaded words joined back into a single text.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Live and final reading metrics, derived from a session and a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingStats {
    pub words_read: usize,
    pub elapsed_seconds: u64,
    pub current_speed: u32,
    pub average_speed: u32,
    /// Fraction of words revealed, in `[0, 1]`.
    pub progress_fraction: f64,
}

/// Which aspect of the text a quiz question probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    MainTopic,
    Detail,
    Comprehension,
}

impl QuestionCategory {
    /// Generation order of the three questions.
    pub const ALL: [QuestionCategory; 3] = [
        QuestionCategory::MainTopic,
        QuestionCategory::Detail,
        QuestionCategory::Comprehension,
    ];
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionCategory::MainTopic => write!(f, "main topic"),
            QuestionCategory::Detail => write!(f, "detail"),
            QuestionCategory::Comprehension => write!(f, "comprehension"),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub prompt: String,
    /// Exactly four options; the generated answer is always first.
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: String,
    pub category: QuestionCategory,
}

/// The quiz shown after a session completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizState {
    /// Question slot the reader is on.
    pub current_index: usize,
    pub questions: Vec<QuizQuestion>,
    /// Question index to chosen option index. Entries are never overwritten.
    pub answers: BTreeMap<usize, usize>,
    pub completed: bool,
    pub result: Option<QuizResult>,
}

impl QuizState {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of recorded answers that match their question's correct option.
    pub fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.answers.get(index) == Some(&question.correct_option_index)
            })
            .count()
    }
}

/// Final quiz outcome. Computed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Reading speed in words per minute at the time of scoring.
    pub reading_speed: u32,
    /// Percentage of correct answers, `0..=100`.
    pub comprehension_rate_percent: u32,
    pub final_score: u32,
    pub feedback_message: String,
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Difficulty bucket of a text, by word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDifficulty {
    Easy,
    Medium,
    Hard,
}

impl TextDifficulty {
    pub fn from_word_count(words: usize) -> Self {
        match words {
            0..=199 => TextDifficulty::Easy,
            200..=399 => TextDifficulty::Medium,
            _ => TextDifficulty::Hard,
        }
    }
}

impl fmt::Display for TextDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextDifficulty::Easy => write!(f, "easy"),
            TextDifficulty::Medium => write!(f, "medium"),
            TextDifficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A paragraph produced by a content provider for a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedText {
    pub id: Uuid,
    pub topic: String,
    pub content: String,
    pub word_count: usize,
    pub difficulty: TextDifficulty,
    pub created_at: DateTime<Utc>,
}

impl GeneratedText {
    pub fn new(topic: &str, content: String) -> Self {
        let word_count = content.split_whitespace().count();
        Self {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            content,
            word_count,
            difficulty: TextDifficulty::from_word_count(word_count),
            created_at: Utc::now(),
        }
    }
}

/// Summary of the loaded text for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInfo {
    /// Topic the text was generated for, `None` for custom text.
    pub topic: Option<String>,
    pub word_count: usize,
    pub difficulty: TextDifficulty,
}

/// One finished reading + quiz, kept in memory for the lifetime of a
/// controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub topic: Option<String>,
    pub reading_speed: u32,
    pub comprehension_rate: u32,
    pub final_score: u32,
    pub duration_secs: u64,
}
