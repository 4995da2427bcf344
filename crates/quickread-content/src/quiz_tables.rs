//! Portuguese keyword tables and question templates for the quiz.

use serde::{Deserialize, Serialize};

use quickread_core::model::QuestionCategory;
use quickread_core::quiz::{KeywordRule, KeywordTable, QuestionTemplate};
use quickread_core::traits::QuizContent;

/// Keyword tables and templates the quiz generator reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizTables {
    pub topics: KeywordTable,
    pub central_ideas: KeywordTable,
    pub main_topic: QuestionTemplate,
    pub detail: QuestionTemplate,
    pub comprehension: QuestionTemplate,
}

impl Default for QuizTables {
    fn default() -> Self {
        Self {
            topics: KeywordTable::new(
                vec![
                    KeywordRule::any(&["leitura", "ler"], "Técnicas de leitura e compreensão"),
                    KeywordRule::any(
                        &["fotossíntese", "plantas"],
                        "Processo de fotossíntese nas plantas",
                    ),
                    KeywordRule::any(
                        &["brasil", "história"],
                        "História e desenvolvimento do Brasil",
                    ),
                    KeywordRule::any(
                        &["programação", "código"],
                        "Programação e desenvolvimento de software",
                    ),
                    KeywordRule::any(
                        &["inteligência artificial", "machine learning"],
                        "Inteligência artificial e suas aplicações",
                    ),
                ],
                "Desenvolvimento de habilidades e conhecimento",
            ),
            central_ideas: KeywordTable::new(
                vec![
                    KeywordRule::all(
                        &["leitura", "velocidade"],
                        "A leitura rápida pode ser desenvolvida com prática",
                    ),
                    KeywordRule::any(
                        &["fotossíntese"],
                        "A fotossíntese é essencial para a vida na Terra",
                    ),
                    KeywordRule::all(
                        &["brasil", "história"],
                        "O Brasil passou por diversas transformações históricas",
                    ),
                    KeywordRule::any(
                        &["programação"],
                        "A programação envolve resolver problemas através de código",
                    ),
                    KeywordRule::any(
                        &["inteligência artificial"],
                        "A IA está transformando diversas áreas da sociedade",
                    ),
                ],
                "O conhecimento se desenvolve através de estudo e prática",
            ),
            main_topic: QuestionTemplate::new(
                "Qual é o tema principal do texto?",
                [
                    "Técnicas de memorização",
                    "História da tecnologia",
                    "Métodos de estudo",
                ],
                "O tema principal é identificado pelas palavras-chave mais frequentes no texto.",
            ),
            detail: QuestionTemplate::new(
                "Segundo o texto, qual afirmação está correta?",
                [
                    "O texto não menciona essa informação específica",
                    "Esta afirmação contradiz o que foi apresentado",
                    "Essa informação não estava presente no texto",
                ],
                "Esta informação estava presente no texto que você acabou de ler.",
            ),
            comprehension: QuestionTemplate::new(
                "Qual é a ideia central que o texto transmite?",
                [
                    "O texto foca principalmente em aspectos teóricos",
                    "A abordagem apresentada é puramente acadêmica",
                    "O conteúdo enfatiza apenas conceitos básicos",
                ],
                "A ideia central conecta todos os conceitos apresentados no texto.",
            ),
        }
    }
}

impl QuizContent for QuizTables {
    fn topic_labels(&self) -> &KeywordTable {
        &self.topics
    }

    fn central_ideas(&self) -> &KeywordTable {
        &self.central_ideas
    }

    fn template(&self, category: QuestionCategory) -> &QuestionTemplate {
        match category {
            QuestionCategory::MainTopic => &self.main_topic,
            QuestionCategory::Detail => &self.detail,
            QuestionCategory::Comprehension => &self.comprehension,
        }
    }
}
