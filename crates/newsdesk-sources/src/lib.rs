//! Newsdesk information sources.
//!
//! Defines the [`NewsSource`] and [`KnowledgeSource`] collaborator traits,
//! HTTP implementations for NewsAPI and a Gemini-style knowledge API, and
//! deterministic mocks for testing the assistant.

pub mod error;
pub mod knowledge_api;
pub mod mock;
pub mod news_api;

use async_trait::async_trait;
use newsdesk_core::{Article, KnowledgeAnswer, NewsCategory};

pub use error::{FailureKind, SourceError};
pub use knowledge_api::GeminiKnowledgeClient;
pub use mock::{MockKnowledgeSource, MockNewsSource};
pub use news_api::NewsApiClient;

/// Source of news articles.
///
/// Implementations are stateless and reentrant: several calls may be
/// outstanding at once. Returned articles always carry a display image.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch top headlines for a category.
    async fn fetch_by_category(&self, category: NewsCategory) -> Result<Vec<Article>, SourceError>;

    /// Free-text article search.
    async fn search(&self, query: &str) -> Result<Vec<Article>, SourceError>;
}

/// General-purpose question answering.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Whether a usable credential is configured. Checked before every call
    /// so an unconfigured source is never contacted.
    fn is_configured(&self) -> bool;

    /// Answer a free-text question.
    async fn ask(&self, text: &str) -> Result<KnowledgeAnswer, SourceError>;
}
