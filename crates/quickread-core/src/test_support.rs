//! Small content fixture shared by the unit tests.

use crate::model::QuestionCategory;
use crate::quiz::{KeywordRule, KeywordTable, QuestionTemplate};
use crate::scoring::{Feedback, FeedbackCategory};
use crate::traits::{FeedbackContent, QuizContent};

pub(crate) struct FixtureContent {
    topics: KeywordTable,
    ideas: KeywordTable,
    templates: [QuestionTemplate; 3],
}

impl Default for FixtureContent {
    fn default() -> Self {
        Self {
            topics: KeywordTable::new(
                vec![KeywordRule::any(&["plants", "photosynthesis"], "Plant biology")],
                "General knowledge",
            ),
            ideas: KeywordTable::new(
                vec![
                    KeywordRule::all(&["reading", "speed"], "Speed reading takes practice"),
                    KeywordRule::any(&["plants"], "Plants sustain life"),
                ],
                "Knowledge grows with practice",
            ),
            templates: [
                QuestionTemplate::new("Main topic?", ["memory", "history", "study"], "topic"),
                QuestionTemplate::new("Which is true?", ["not said", "contradicts", "absent"], "detail"),
                QuestionTemplate::new("Central idea?", ["theory", "academic", "basics"], "idea"),
            ],
        }
    }
}

impl QuizContent for FixtureContent {
    fn topic_labels(&self) -> &KeywordTable {
        &self.topics
    }

    fn central_ideas(&self) -> &KeywordTable {
        &self.ideas
    }

    fn template(&self, category: QuestionCategory) -> &QuestionTemplate {
        match category {
            QuestionCategory::MainTopic => &self.templates[0],
            QuestionCategory::Detail => &self.templates[1],
            QuestionCategory::Comprehension => &self.templates[2],
        }
    }
}

impl FeedbackContent for FixtureContent {
    fn feedback(&self, category: FeedbackCategory) -> Feedback {
        Feedback {
            message: category.to_string(),
            suggestions: vec!["one".into(), "two".into(), "three".into()],
        }
    }
}
