//! Quiz scoring and feedback selection.
//!
//! The final score weights reading speed by comprehension:
//!
//! ```text
//! comprehension = round(correct / total * 100)
//! final_score   = floor(speed * comprehension / 100)
//! ```
//!
//! Feedback is picked from an ordered rule table, first match wins.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{QuizResult, QuizState};
use crate::traits::FeedbackContent;

/// Feedback bucket a result falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    /// High comprehension at a high speed.
    Balanced,
    /// High comprehension; speed can go up.
    ComprehensionHigh,
    /// Fair comprehension; slow down a little.
    Improvement,
    /// Low comprehension; slow down and use simpler texts.
    ComprehensionLow,
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackCategory::Balanced => write!(f, "balanced"),
            FeedbackCategory::ComprehensionHigh => write!(f, "comprehension_high"),
            FeedbackCategory::Improvement => write!(f, "improvement"),
            FeedbackCategory::ComprehensionLow => write!(f, "comprehension_low"),
        }
    }
}

/// Message and ordered suggestions for a feedback category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub suggestions: Vec<String>,
}

/// A row of the feedback rule table. Both thresholds are inclusive minimums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackRule {
    pub min_comprehension: u32,
    pub min_speed: u32,
    pub category: FeedbackCategory,
}

/// Ordered feedback rules. The last row matches everything.
pub const FEEDBACK_RULES: [FeedbackRule; 4] = [
    FeedbackRule {
        min_comprehension: 80,
        min_speed: 400,
        category: FeedbackCategory::Balanced,
    },
    FeedbackRule {
        min_comprehension: 80,
        min_speed: 0,
        category: FeedbackCategory::ComprehensionHigh,
    },
    FeedbackRule {
        min_comprehension: 60,
        min_speed: 0,
        category: FeedbackCategory::Improvement,
    },
    FeedbackRule {
        min_comprehension: 0,
        min_speed: 0,
        category: FeedbackCategory::ComprehensionLow,
    },
];

/// Pick the feedback category for a comprehension percentage and speed.
pub fn classify(comprehension: u32, speed: u32) -> FeedbackCategory {
    FEEDBACK_RULES
        .iter()
        .find(|rule| comprehension >= rule.min_comprehension && speed >= rule.min_speed)
        .map(|rule| rule.category)
        .unwrap_or(FeedbackCategory::ComprehensionLow)
}

/// Percentage of questions answered correctly, rounded. Unanswered
/// questions count as wrong; an empty quiz scores 0.
pub fn comprehension_rate(quiz: &QuizState) -> u32 {
    let total = quiz.questions.len();
    if total == 0 {
        return 0;
    }
    (quiz.correct_count() as f64 / total as f64 * 100.0).round() as u32
}

/// Reading speed weighted by comprehension, rounded down.
pub fn final_score(reading_speed: u32, comprehension: u32) -> u32 {
    (u64::from(reading_speed) * u64::from(comprehension) / 100) as u32
}

/// Turns an answered quiz into a [`QuizResult`].
#[derive(Clone)]
pub struct ScoringEngine {
    feedback: Arc<dyn FeedbackContent>,
}

impl ScoringEngine {
    pub fn new(feedback: Arc<dyn FeedbackContent>) -> Self {
        Self { feedback }
    }

    /// Score `quiz` at `reading_speed` words per minute.
    pub fn score(&self, quiz: &QuizState, reading_speed: u32) -> QuizResult {
        let comprehension = comprehension_rate(quiz);
        let category = classify(comprehension, reading_speed);
        let Feedback {
            message,
            suggestions,
        } = self.feedback.feedback(category);

        tracing::debug!(
            comprehension,
            reading_speed,
            %category,
            "quiz scored"
        );

        QuizResult {
            reading_speed,
            comprehension_rate_percent: comprehension,
            final_score: final_score(reading_speed, comprehension),
            feedback_message: message,
            suggestions,
            timestamp: Utc::now(),
        }
    }
}
