//! Mock sources for testing.
//!
//! Both mocks return canned data, record every call, and can hold a call
//! until a [`Notify`] is signalled so tests decide the order in which
//! overlapping requests resolve.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use newsdesk_core::{Article, Citation, KnowledgeAnswer, NewsCategory};
use tokio::sync::Notify;

use crate::error::SourceError;
use crate::{KnowledgeSource, NewsSource};

/// Build a deterministic sample article.
pub fn sample_article(index: usize, source_name: &str) -> Article {
    Article {
        title: format!("Sample headline {}", index),
        description: Some(format!("Summary of story {}", index)),
        url: format!("https://news.example/{}", index),
        image_url: format!("https://news.example/{}.jpg", index),
        published_at: Utc.timestamp_opt(1_700_000_000 + index as i64 * 60, 0).single(),
        author: None,
        source_name: source_name.to_string(),
    }
}

fn record(calls: &Mutex<Vec<String>>, call: String) {
    if let Ok(mut calls) = calls.lock() {
        calls.push(call);
    }
}

fn recorded(calls: &Mutex<Vec<String>>) -> Vec<String> {
    calls.lock().map(|c| c.clone()).unwrap_or_default()
}

async fn wait_for_release(holds: &HashMap<String, Arc<Notify>>, key: &str) {
    if let Some(gate) = holds.get(key) {
        gate.notified().await;
    }
}

// =============================================================================
// MockNewsSource
// =============================================================================

/// Mock news source.
///
/// Calls are recorded as `category:<name>` or `search:<query>`; the same
/// string is the key used by [`MockNewsSource::hold`].
pub struct MockNewsSource {
    articles: Vec<Article>,
    failure: Option<SourceError>,
    holds: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl MockNewsSource {
    /// Mock returning eight sample articles for any request.
    pub fn new() -> Self {
        Self::with_articles((1..=8).map(|i| sample_article(i, "Mock Wire")).collect())
    }

    /// Mock returning the given articles for any request.
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles,
            failure: None,
            holds: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock that finds nothing.
    pub fn empty() -> Self {
        Self::with_articles(Vec::new())
    }

    /// Mock whose every call fails with `error`.
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::empty()
        }
    }

    /// Hold calls matching `key` until `gate` is notified.
    pub fn hold(mut self, key: impl Into<String>, gate: Arc<Notify>) -> Self {
        self.holds.insert(key.into(), gate);
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        recorded(&self.calls)
    }

    async fn respond(&self, key: String) -> Result<Vec<Article>, SourceError> {
        record(&self.calls, key.clone());
        wait_for_release(&self.holds, &key).await;
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.articles.clone()),
        }
    }
}

impl Default for MockNewsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    async fn fetch_by_category(&self, category: NewsCategory) -> Result<Vec<Article>, SourceError> {
        self.respond(format!("category:{}", category.api_name())).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, SourceError> {
        self.respond(format!("search:{}", query)).await
    }
}

// =============================================================================
// MockKnowledgeSource
// =============================================================================

/// Mock knowledge source. Calls are recorded and held by question text.
pub struct MockKnowledgeSource {
    answer: KnowledgeAnswer,
    configured: bool,
    failure: Option<SourceError>,
    holds: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl MockKnowledgeSource {
    /// Configured mock answering with a sample answer and two citations.
    pub fn new() -> Self {
        Self::with_answer(KnowledgeAnswer {
            answer_text: "Here is what I found.".to_string(),
            citations: vec![
                Citation {
                    title: "Reference one".to_string(),
                    url: "https://kb.example/1".to_string(),
                    snippet: "First supporting passage.".to_string(),
                },
                Citation {
                    title: "Reference two".to_string(),
                    url: "https://kb.example/2".to_string(),
                    snippet: "Second supporting passage.".to_string(),
                },
            ],
        })
    }

    /// Configured mock returning `answer` for any question.
    pub fn with_answer(answer: KnowledgeAnswer) -> Self {
        Self {
            answer,
            configured: true,
            failure: None,
            holds: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock with no credential configured.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Configured mock whose every call fails with `error`.
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Hold calls asking exactly `question` until `gate` is notified.
    pub fn hold(mut self, question: impl Into<String>, gate: Arc<Notify>) -> Self {
        self.holds.insert(question.into(), gate);
        self
    }

    /// Questions received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        recorded(&self.calls)
    }
}

impl Default for MockKnowledgeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeSource for MockKnowledgeSource {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn ask(&self, text: &str) -> Result<KnowledgeAnswer, SourceError> {
        record(&self.calls, text.to_string());
        wait_for_release(&self.holds, text).await;
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.answer.clone()),
        }
    }
}
