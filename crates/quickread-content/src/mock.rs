//! Mock content provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use quickread_core::model::GeneratedText;
use quickread_core::traits::ContentProvider;

use crate::error::ContentError;

/// A content provider with canned paragraphs, optional latency, and an
/// optional forced failure.
pub struct MockContentProvider {
    /// (topic substring, paragraph) pairs, checked in order.
    paragraphs: Vec<(String, String)>,
    default_paragraph: String,
    latency: Duration,
    /// When set, every request fails with this message.
    failure: Option<String>,
    call_count: AtomicU32,
    last_topic: Mutex<Option<String>>,
}

impl MockContentProvider {
    pub fn new(paragraphs: Vec<(String, String)>) -> Self {
        Self {
            paragraphs,
            default_paragraph: "mock paragraph".to_string(),
            latency: Duration::ZERO,
            failure: None,
            call_count: AtomicU32::new(0),
            last_topic: Mutex::new(None),
        }
    }

    /// A mock that always returns the same paragraph.
    pub fn with_fixed_paragraph(paragraph: &str) -> Self {
        Self {
            default_paragraph: paragraph.to_string(),
            ..Self::new(Vec::new())
        }
    }

    /// A mock whose every request fails.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_topic(&self) -> Option<String> {
        self.last_topic
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ContentProvider for MockContentProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup_paragraph(&self, topic: &str) -> anyhow::Result<GeneratedText> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_topic
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(topic.to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(message) = &self.failure {
            return Err(ContentError::Unavailable(message.clone()).into());
        }

        let paragraph = self
            .paragraphs
            .iter()
            .find(|(key, _)| topic.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_paragraph.clone());

        Ok(GeneratedText::new(topic, paragraph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_paragraph() {
        let provider = MockContentProvider::with_fixed_paragraph("one two three");
        let text = provider.lookup_paragraph("anything").await.unwrap();
        assert_eq!(text.content, "one two three");
        assert_eq!(text.word_count, 3);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_topic().as_deref(), Some("anything"));
    }

    #[tokio::test]
    async fn topic_matching() {
        let provider = MockContentProvider::new(vec![(
            "rust".to_string(),
            "Rust has ownership.".to_string(),
        )]);

        let text = provider.lookup_paragraph("learning rust").await.unwrap();
        assert_eq!(text.content, "Rust has ownership.");
        let text = provider.lookup_paragraph("go").await.unwrap();
        assert_eq!(text.content, "mock paragraph");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn first_matching_entry_wins() {
        let provider = MockContentProvider::new(vec![
            ("photo".to_string(), "Light.".to_string()),
            ("photosynthesis".to_string(), "Chlorophyll.".to_string()),
        ]);
        for _ in 0..10 {
            let text = provider.lookup_paragraph("photosynthesis").await.unwrap();
            assert_eq!(text.content, "Light.");
        }
    }

    #[tokio::test]
    async fn failing_reports_message() {
        let provider = MockContentProvider::failing("offline");
        let err = provider.lookup_paragraph("x").await.unwrap_err();
        assert_eq!(err.to_string(), "content unavailable: offline");
        assert_eq!(provider.call_count(), 1);
    }
}
