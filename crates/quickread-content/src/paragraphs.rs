//! Built-in paragraph provider.
//!
//! Stands in for a real text generator: a small table of Portuguese
//! paragraphs keyed by topic keywords, plus a generic paragraph that embeds
//! the requested topic. A configurable delay simulates generation latency.

use std::time::Duration;

use async_trait::async_trait;

use quickread_core::model::GeneratedText;
use quickread_core::quiz::{KeywordRule, KeywordTable};
use quickread_core::traits::ContentProvider;

use crate::error::ContentError;

/// Placeholder replaced by the topic in the fallback paragraph.
const TOPIC_PLACEHOLDER: &str = "{topic}";

const PHOTOSYNTHESIS: &str = "A fotossíntese é um processo biológico fundamental realizado pelas \
    plantas, algas e algumas bactérias. Durante este processo, os organismos \
    convertem energia luminosa, geralmente do sol, em energia química \
    armazenada em moléculas de glicose. A fotossíntese ocorre principalmente \
    nas folhas das plantas, especificamente nos cloroplastos, organelas que \
    contêm clorofila. A equação básica da fotossíntese é: 6CO2 + 6H2O + \
    energia luminosa → C6H12O6 + 6O2. Este processo é essencial para a vida na \
    Terra, pois produz oxigênio e serve como base da cadeia alimentar.";

const BRAZIL_HISTORY: &str = "A história do Brasil é rica e complexa, começando com os povos indígenas \
    que habitavam o território há milhares de anos. Em 1500, Pedro Álvares \
    Cabral chegou ao Brasil, iniciando o período colonial português. Durante \
    os séculos XVI a XVIII, o Brasil foi explorado principalmente para \
    extração de pau-brasil, cultivo de cana-de-açúcar e mineração de ouro. O \
    trabalho escravo foi amplamente utilizado, trazendo milhões de africanos \
    forçadamente. Em 1822, Dom Pedro I declarou a independência do Brasil. O \
    período imperial durou até 1889, quando foi proclamada a República.";

const PROGRAMMING: &str = "A programação é o processo de criar instruções para computadores \
    executarem tarefas específicas. Envolve escrever código usando linguagens \
    de programação como Python, Java, JavaScript, C++ e muitas outras. Cada \
    linguagem tem suas próprias regras de sintaxe e é adequada para diferentes \
    tipos de projetos. Os conceitos fundamentais incluem variáveis, estruturas \
    de controle, funções, algoritmos e estruturas de dados. A programação \
    orientada a objetos organiza código em classes e objetos, facilitando a \
    manutenção e reutilização.";

const ARTIFICIAL_INTELLIGENCE: &str = "A Inteligência Artificial (IA) é um campo da ciência da computação que \
    busca criar sistemas capazes de realizar tarefas que normalmente requerem \
    inteligência humana. Isso inclui aprendizado, raciocínio, percepção, \
    compreensão de linguagem natural e tomada de decisões. A IA moderna se \
    baseia em técnicas como machine learning, deep learning e redes neurais \
    artificiais. O machine learning permite que sistemas aprendam padrões a \
    partir de dados sem programação explícita. Deep learning usa redes neurais \
    profundas para processar informações complexas.";

const FALLBACK: &str = "{topic} é um assunto fascinante que merece estudo aprofundado. Este campo \
    de conhecimento abrange diversos aspectos teóricos e práticos que são \
    fundamentais para compreender sua importância. Os especialistas dedicam \
    anos de pesquisa para desvendar os mistérios e complexidades relacionados \
    a {topic}. Através de metodologias científicas rigorosas, é possível \
    analisar diferentes perspectivas e abordagens. A aplicação prática destes \
    conhecimentos tem impacto significativo em nossa sociedade.";

/// Paragraph lookup over a fixed table.
pub struct StaticParagraphProvider {
    paragraphs: KeywordTable,
    latency: Duration,
}

impl StaticParagraphProvider {
    pub fn new(latency: Duration) -> Self {
        Self {
            paragraphs: KeywordTable::new(
                vec![
                    KeywordRule::any(&["fotossíntese", "plantas"], PHOTOSYNTHESIS),
                    KeywordRule::any(&["brasil", "história"], BRAZIL_HISTORY),
                    KeywordRule::any(&["programação", "código"], PROGRAMMING),
                    KeywordRule::any(&["inteligência artificial", "ia"], ARTIFICIAL_INTELLIGENCE),
                ],
                FALLBACK,
            ),
            latency,
        }
    }

    /// Provider that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// The paragraph for `topic`, without the simulated delay.
    pub fn paragraph_for(&self, topic: &str) -> String {
        match self.paragraphs.find(topic) {
            Some(paragraph) => paragraph.to_string(),
            None => self.paragraphs.fallback.replace(TOPIC_PLACEHOLDER, topic),
        }
    }
}

impl Default for StaticParagraphProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl ContentProvider for StaticParagraphProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn lookup_paragraph(&self, topic: &str) -> anyhow::Result<GeneratedText> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ContentError::EmptyTopic.into());
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let text = GeneratedText::new(topic, self.paragraph_for(topic));
        tracing::debug!(
            topic,
            words = text.word_count,
            difficulty = %text.difficulty,
            "paragraph ready"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use quickread_core::model::TextDifficulty;

    use super::*;

    #[test]
    fn picks_paragraph_by_keyword() {
        let provider = StaticParagraphProvider::instant();
        assert!(provider
            .paragraph_for("Fotossíntese")
            .starts_with("A fotossíntese é um processo"));
        assert!(provider
            .paragraph_for("história do Brasil")
            .starts_with("A história do Brasil"));
        assert!(provider
            .paragraph_for("código limpo")
            .starts_with("A programação é o processo"));
        assert!(provider
            .paragraph_for("Inteligência Artificial")
            .starts_with("A Inteligência Artificial (IA)"));
    }

    #[test]
    fn fallback_embeds_topic() {
        let provider = StaticParagraphProvider::instant();
        let paragraph = provider.paragraph_for("Xadrez");
        assert!(paragraph.starts_with("Xadrez é um assunto fascinante"));
        assert!(paragraph.contains("relacionados a Xadrez."));
        assert!(!paragraph.contains(TOPIC_PLACEHOLDER));
    }

    #[tokio::test]
    async fn blank_topic_is_rejected() {
        let provider = StaticParagraphProvider::instant();
        let err = provider.lookup_paragraph("   ").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::EmptyTopic)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_latency() {
        let provider = StaticParagraphProvider::default();
        let started = tokio::time::Instant::now();
        let text = provider.lookup_paragraph(" plantas ").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(text.topic, "plantas");
        assert_eq!(text.word_count, 83);
        assert_eq!(text.difficulty, TextDifficulty::Easy);
    }
}
