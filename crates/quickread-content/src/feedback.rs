//! Portuguese feedback messages for each result category.

use serde::{Deserialize, Serialize};

use quickread_core::scoring::{Feedback, FeedbackCategory};
use quickread_core::traits::FeedbackContent;

fn feedback(message: &str, suggestions: [&str; 3]) -> Feedback {
    Feedback {
        message: message.to_string(),
        suggestions: suggestions.map(str::to_string).to_vec(),
    }
}

/// One [`Feedback`] per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTable {
    pub balanced: Feedback,
    pub comprehension_high: Feedback,
    pub improvement: Feedback,
    pub comprehension_low: Feedback,
}

impl Default for FeedbackTable {
    fn default() -> Self {
        Self {
            balanced: feedback(
                "Excelente! Você está conseguindo manter alta velocidade com ótima compreensão. Continue assim!",
                [
                    "Tente aumentar gradualmente a velocidade",
                    "Mantenha o foco na compreensão",
                    "Pratique com textos mais complexos",
                ],
            ),
            comprehension_high: feedback(
                "Ótima compreensão! Agora você pode tentar aumentar gradualmente a velocidade.",
                [
                    "Aumente a velocidade em 50 PPM",
                    "Mantenha a qualidade da compreensão",
                    "Pratique regularmente",
                ],
            ),
            improvement: feedback(
                "Boa compreensão! Tente diminuir um pouco a velocidade para melhorar o entendimento.",
                [
                    "Diminua a velocidade em 50 PPM",
                    "Foque na compreensão primeiro",
                    "Pratique com textos mais simples",
                ],
            ),
            comprehension_low: feedback(
                "Foque na compreensão primeiro. Diminua a velocidade e pratique com textos mais simples.",
                [
                    "Comece com velocidades menores (200-250 PPM)",
                    "Pratique com textos mais curtos",
                    "Use o modo foco para reduzir distrações",
                ],
            ),
        }
    }
}

impl FeedbackContent for FeedbackTable {
    fn feedback(&self, category: FeedbackCategory) -> Feedback {
        match category {
            FeedbackCategory::Balanced => self.balanced.clone(),
            FeedbackCategory::ComprehensionHigh => self.comprehension_high.clone(),
            FeedbackCategory::Improvement => self.improvement.clone(),
            FeedbackCategory::ComprehensionLow => self.comprehension_low.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_three_suggestions() {
        let table = FeedbackTable::default();
        for category in [
            FeedbackCategory::Balanced,
            FeedbackCategory::ComprehensionHigh,
            FeedbackCategory::Improvement,
            FeedbackCategory::ComprehensionLow,
        ] {
            let feedback = table.feedback(category);
            assert!(!feedback.message.is_empty());
            assert_eq!(feedback.suggestions.len(), 3, "{category}");
        }
    }

    #[test]
    fn low_comprehension_suggests_focus_mode() {
        let feedback = FeedbackTable::default().feedback(FeedbackCategory::ComprehensionLow);
        assert!(feedback.message.starts_with("Foque na compreensão"));
        assert_eq!(
            feedback.suggestions[2],
            "Use o modo foco para reduzir distrações"
        );
    }
}
