//! Quiz generation and answer bookkeeping.
//!
//! A quiz always has three questions in a fixed order: main topic, a detail
//! sentence lifted from the text, and the central idea. Labels come from
//! keyword tables supplied by a [`QuizContent`] implementation; the
//! generated answer is always the first option.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{QuestionCategory, QuizQuestion, QuizResult, QuizState};
use crate::traits::QuizContent;

/// Sentences this short (in characters, after trimming) are not detail
/// candidates.
const MIN_SENTENCE_CHARS: usize = 10;

/// One row of a keyword table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Lowercase keywords searched for as substrings.
    pub keywords: Vec<String>,
    /// When set, every keyword must be present instead of any one.
    #[serde(default)]
    pub require_all: bool,
    pub label: String,
}

impl KeywordRule {
    /// Rule that matches when any keyword is present.
    pub fn any(keywords: &[&str], label: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            require_all: false,
            label: label.to_string(),
        }
    }

    /// Rule that matches only when all keywords are present.
    pub fn all(keywords: &[&str], label: &str) -> Self {
        Self {
            require_all: true,
            ..Self::any(keywords, label)
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        if self.require_all {
            self.keywords.iter().all(|k| lowered.contains(k.as_str()))
        } else {
            self.keywords.iter().any(|k| lowered.contains(k.as_str()))
        }
    }
}

/// Ordered keyword-to-label table. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub rules: Vec<KeywordRule>,
    /// Label used when no rule matches.
    pub fallback: String,
}

impl KeywordTable {
    pub fn new(rules: Vec<KeywordRule>, fallback: &str) -> Self {
        Self {
            rules,
            fallback: fallback.to_string(),
        }
    }

    /// Label of the first rule matching `text`, ignoring case.
    pub fn find(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.label.as_str())
    }

    /// Case-insensitive lookup of the label for `text`.
    pub fn lookup(&self, text: &str) -> &str {
        self.find(text).unwrap_or(self.fallback.as_str())
    }
}

/// Fixed wording for one question category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub prompt: String,
    /// The three wrong options, shown after the generated answer.
    pub decoys: [String; 3],
    pub explanation: String,
}

impl QuestionTemplate {
    pub fn new(prompt: &str, decoys: [&str; 3], explanation: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            decoys: decoys.map(str::to_string),
            explanation: explanation.to_string(),
        }
    }
}

/// Builds quizzes from a finished text.
#[derive(Clone)]
pub struct QuizGenerator {
    content: Arc<dyn QuizContent>,
}

impl QuizGenerator {
    pub fn new(content: Arc<dyn QuizContent>) -> Self {
        Self { content }
    }

    /// Generate the three-question quiz for `text`.
    pub fn generate(&self, text: &str) -> QuizState {
        let questions = QuestionCategory::ALL
            .iter()
            .map(|&category| {
                let answer = match category {
                    QuestionCategory::MainTopic => {
                        self.content.topic_labels().lookup(text).to_string()
                    }
                    QuestionCategory::Detail => key_sentence(text),
                    QuestionCategory::Comprehension => {
                        self.content.central_ideas().lookup(text).to_string()
                    }
                };
                self.build_question(category, answer)
            })
            .collect();

        QuizState::new(questions)
    }

    fn build_question(&self, category: QuestionCategory, answer: String) -> QuizQuestion {
        let template = self.content.template(category);
        let mut options = Vec::with_capacity(4);
        options.push(answer);
        options.extend(template.decoys.iter().cloned());

        QuizQuestion {
            id: Uuid::new_v4(),
            prompt: template.prompt.clone(),
            options,
            correct_option_index: 0,
            explanation: template.explanation.clone(),
            category,
        }
    }
}

/// Split `text` into sentences on `.`, `!`, and `?`, keeping trimmed
/// sentences longer than ten characters.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// The middle sentence of `text`, falling back to the first, then to "".
pub fn key_sentence(text: &str) -> String {
    let sentences = sentences(text);
    sentences
        .get(sentences.len() / 2)
        .or_else(|| sentences.first())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Result of recording an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was stored; more questions remain.
    Recorded,
    /// The last question slot was answered; the quiz should be scored now.
    ReadyToScore,
}

impl QuizState {
    /// Record `option` as the answer to `question`.
    ///
    /// The first answer to a question is final. Answering the last question
    /// slot reports [`AnswerOutcome::ReadyToScore`] even if earlier slots are
    /// still open.
    pub fn select_answer(
        &mut self,
        question: usize,
        option: usize,
    ) -> Result<AnswerOutcome, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NotActive);
        }
        if self.completed {
            return Err(QuizError::AlreadyCompleted);
        }
        let options = self
            .questions
            .get(question)
            .map(|q| q.options.len())
            .unwrap_or(0);
        if option >= options {
            return Err(QuizError::InvalidAnswerIndex { question, option });
        }
        if self.answers.contains_key(&question) {
            return Err(QuizError::DuplicateAnswer(question));
        }

        self.answers.insert(question, option);
        let last = self.questions.len() - 1;
        self.current_index = (question + 1).min(last);

        if question == last {
            Ok(AnswerOutcome::ReadyToScore)
        } else {
            Ok(AnswerOutcome::Recorded)
        }
    }

    /// Attach the final result and mark the quiz completed.
    pub fn complete(&mut self, result: QuizResult) {
        self.completed = true;
        self.result = Some(result);
    }

    /// Discard the quiz.
    pub fn close(&mut self) {
        *self = QuizState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureContent;

    fn generator() -> QuizGenerator {
        QuizGenerator::new(Arc::new(FixtureContent::default()))
    }

    #[test]
    fn keyword_table_first_match_wins() {
        let table = KeywordTable::new(
            vec![
                KeywordRule::any(&["reading", "read"], "Reading"),
                KeywordRule::any(&["plants"], "Plants"),
            ],
            "General",
        );
        assert_eq!(table.lookup("Plants like READING too"), "Reading");
        assert_eq!(table.lookup("Some PLANTS grow"), "Plants");
        assert_eq!(table.lookup("nothing here"), "General");
    }

    #[test]
    fn keyword_table_conjunctive_rule() {
        let table = KeywordTable::new(
            vec![KeywordRule::all(&["reading", "speed"], "Speed reading")],
            "General",
        );
        assert_eq!(table.lookup("reading at speed"), "Speed reading");
        assert_eq!(table.lookup("reading slowly"), "General");
    }

    #[test]
    fn sentences_filters_short_fragments() {
        let text = "Short. This sentence is long enough! Tiny? Another long sentence here.";
        assert_eq!(
            sentences(text),
            vec!["This sentence is long enough", "Another long sentence here"]
        );
    }

    #[test]
    fn key_sentence_picks_middle() {
        let text = "First sentence is here. Second sentence is here. Third sentence is here.";
        assert_eq!(key_sentence(text), "Second sentence is here");
        let text = "First sentence is here. Second sentence is here.";
        assert_eq!(key_sentence(text), "Second sentence is here");
    }

    #[test]
    fn key_sentence_fallbacks() {
        assert_eq!(key_sentence("Only one long sentence"), "Only one long sentence");
        assert_eq!(key_sentence("the quick brown fox jumps"), "the quick brown fox jumps");
        assert_eq!(key_sentence("tiny. bits."), "");
        assert_eq!(key_sentence(""), "");
    }

    #[test]
    fn generates_three_questions_in_order() {
        let quiz = generator().generate("Plants turn light into sugar. Yes.");
        assert_eq!(quiz.questions.len(), 3);
        let categories: Vec<_> = quiz.questions.iter().map(|q| q.category).collect();
        assert_eq!(categories, QuestionCategory::ALL.to_vec());
        for question in &quiz.questions {
            assert_eq!(question.options.len(), 4);
            assert_eq!(question.correct_option_index, 0);
        }
        assert_eq!(quiz.questions[0].options[0], "Plant biology");
        assert_eq!(quiz.questions[1].options[0], "Plants turn light into sugar");
        assert_eq!(quiz.questions[2].options[0], "Plants sustain life");
        assert!(!quiz.completed);
        assert!(quiz.answers.is_empty());
    }

    #[test]
    fn generates_fallback_labels() {
        let quiz = generator().generate("the quick brown fox jumps");
        assert_eq!(quiz.questions[0].options[0], "General knowledge");
        assert_eq!(quiz.questions[1].options[0], "the quick brown fox jumps");
        assert_eq!(quiz.questions[2].options[0], "Knowledge grows with practice");
    }

    #[test]
    fn first_answer_is_final() {
        let mut quiz = generator().generate("the quick brown fox jumps");
        assert_eq!(quiz.select_answer(0, 2), Ok(AnswerOutcome::Recorded));
        assert_eq!(quiz.select_answer(0, 0), Err(QuizError::DuplicateAnswer(0)));
        assert_eq!(quiz.answers.get(&0), Some(&2));
        assert_eq!(quiz.current_index, 1);
    }

    #[test]
    fn rejects_out_of_range() {
        let mut quiz = generator().generate("the quick brown fox jumps");
        assert_eq!(
            quiz.select_answer(3, 0),
            Err(QuizError::InvalidAnswerIndex {
                question: 3,
                option: 0
            })
        );
        assert_eq!(
            quiz.select_answer(0, 4),
            Err(QuizError::InvalidAnswerIndex {
                question: 0,
                option: 4
            })
        );
        assert!(quiz.answers.is_empty());
    }

    #[test]
    fn empty_quiz_is_not_active() {
        let mut quiz = QuizState::default();
        assert_eq!(quiz.select_answer(0, 0), Err(QuizError::NotActive));
    }

    #[test]
    fn last_slot_triggers_scoring_even_out_of_order() {
        let mut quiz = generator().generate("the quick brown fox jumps");
        assert_eq!(quiz.select_answer(2, 1), Ok(AnswerOutcome::ReadyToScore));
        assert_eq!(quiz.current_index, 2);
    }

    #[test]
    fn completed_quiz_rejects_answers_and_close_resets() {
        let mut quiz = generator().generate("the quick brown fox jumps");
        quiz.select_answer(0, 0).unwrap();
        quiz.select_answer(1, 0).unwrap();
        quiz.select_answer(2, 0).unwrap();
        quiz.complete(QuizResult {
            reading_speed: 300,
            comprehension_rate_percent: 100,
            final_score: 300,
            feedback_message: String::new(),
            suggestions: vec![],
            timestamp: chrono::Utc::now(),
        });
        assert!(quiz.completed);
        assert_eq!(quiz.select_answer(1, 1), Err(QuizError::AlreadyCompleted));

        quiz.close();
        assert_eq!(quiz, QuizState::default());
    }
}
