//! NewsAPI.org client.
//!
//! Wraps the `top-headlines` and `everything` endpoints behind
//! [`NewsSource`]. Articles without a display image are dropped before they
//! reach the caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsdesk_core::config::NewsConfig;
use newsdesk_core::{Article, NewsCategory};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::NewsSource;

/// HTTP client for the NewsAPI v2 endpoints.
pub struct NewsApiClient {
    client: Client,
    config: NewsConfig,
}

impl NewsApiClient {
    /// Build a client from configuration.
    pub fn new(config: NewsConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Build an authenticated request. Fails before any I/O without a key.
    fn prepare(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::RequestBuilder, SourceError> {
        let key = self.config.credential().ok_or(SourceError::MissingCredential)?;
        Ok(self
            .client
            .get(self.endpoint(path))
            .header("X-Api-Key", key)
            .query(params))
    }

    async fn get_articles(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Article>, SourceError> {
        let response = self.prepare(path, params)?.send().await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<NewsApiResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "News API returned an error status");
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let articles = parse_articles(&body)?;
        debug!(path, count = articles.len(), "Fetched news articles");
        Ok(articles)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_by_category(&self, category: NewsCategory) -> Result<Vec<Article>, SourceError> {
        let mut params = vec![
            ("country", self.config.country.clone()),
            ("pageSize", self.config.page_size.to_string()),
        ];
        if !category.is_general() {
            params.push(("category", category.api_name().to_string()));
        }
        self.get_articles("top-headlines", &params).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, SourceError> {
        let params = vec![
            ("q", query.to_string()),
            ("language", self.config.language.clone()),
            ("pageSize", self.config.page_size.to_string()),
            ("sortBy", self.config.sort_by.clone()),
        ];
        self.get_articles("everything", &params).await
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    author: Option<String>,
    #[serde(default)]
    source: NewsApiSource,
}

#[derive(Debug, Default, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Parse a NewsAPI response body into articles that can be displayed.
///
/// A body whose `status` is not `"ok"` is a [`SourceError::Rejected`].
/// Articles without a title, link, or image are skipped, as are the
/// `[Removed]` tombstones the service returns for withdrawn stories.
pub fn parse_articles(body: &str) -> Result<Vec<Article>, SourceError> {
    let response: NewsApiResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    if response.status != "ok" {
        return Err(SourceError::Rejected {
            code: response.code.unwrap_or_else(|| "unknown".to_string()),
            message: response.message.unwrap_or_default(),
        });
    }

    Ok(response
        .articles
        .into_iter()
        .filter_map(into_article)
        .collect())
}

fn into_article(raw: NewsApiArticle) -> Option<Article> {
    let title = raw.title.filter(|t| !t.trim().is_empty() && t != "[Removed]")?;
    let url = raw.url.filter(|u| !u.trim().is_empty())?;
    let image_url = raw.url_to_image.filter(|u| !u.trim().is_empty())?;
    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(Article {
        title,
        description: raw.description,
        url,
        image_url,
        published_at,
        author: raw.author,
        source_name: raw.source.name.unwrap_or_else(|| "Unknown".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    const OK_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": null, "name": "The Verge"},
                "author": "Jane Doe",
                "title": "Chip makers race ahead",
                "description": "A look at the new silicon.",
                "url": "https://example.com/chips",
                "urlToImage": "https://example.com/chips.jpg",
                "publishedAt": "2025-03-01T12:30:00Z",
                "content": "..."
            },
            {
                "source": {"id": null, "name": "Wire"},
                "author": null,
                "title": "No picture here",
                "description": null,
                "url": "https://example.com/plain",
                "urlToImage": null,
                "publishedAt": "2025-03-01T10:00:00Z"
            },
            {
                "source": {"id": null, "name": "[Removed]"},
                "title": "[Removed]",
                "url": "https://removed.com",
                "urlToImage": "https://removed.com/x.jpg"
            }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_only_displayable_articles() {
        let articles = parse_articles(OK_BODY).unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.title, "Chip makers race ahead");
        assert_eq!(a.source_name, "The Verge");
        assert_eq!(a.author.as_deref(), Some("Jane Doe"));
        assert_eq!(a.image_url, "https://example.com/chips.jpg");
        assert!(a.published_at.is_some());
    }

    #[test]
    fn test_parse_error_status_is_rejected() {
        let body = r#"{"status":"error","code":"apiKeyMissing","message":"Your API key is missing."}"#;
        let err = parse_articles(body).unwrap_err();
        assert!(matches!(err, SourceError::Rejected { .. }));
        assert_eq!(err.kind(), FailureKind::Misconfiguration);
    }

    #[test]
    fn test_parse_malformed_body_is_decode_error() {
        let err = parse_articles("<html>oops</html>").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn test_parse_empty_article_list() {
        let articles = parse_articles(r#"{"status":"ok","articles":[]}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_unparseable_date_is_dropped_not_fatal() {
        let body = r#"{"status":"ok","articles":[{
            "source": {"name": "X"},
            "title": "T",
            "url": "https://x",
            "urlToImage": "https://x/i.png",
            "publishedAt": "yesterday"
        }]}"#;
        let articles = parse_articles(body).unwrap();
        assert_eq!(articles.len(), 1);
        assert!(articles[0].published_at.is_none());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = NewsApiClient::new(NewsConfig::default()).unwrap();
        let err = client
            .fetch_by_category(NewsCategory::Technology)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingCredential));
    }

    #[test]
    fn test_request_sends_trimmed_key() {
        let config = NewsConfig {
            api_key: " news-key\n".to_string(),
            ..NewsConfig::default()
        };
        let client = NewsApiClient::new(config).unwrap();
        let request = client
            .prepare("top-headlines", &[("country", "us".to_string())])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("X-Api-Key").unwrap().to_str().unwrap(),
            "news-key"
        );
        assert_eq!(request.url().query(), Some("country=us"));
    }

    #[test]
    fn test_blank_key_is_missing_credential() {
        let config = NewsConfig {
            api_key: "   ".to_string(),
            ..NewsConfig::default()
        };
        let client = NewsApiClient::new(config).unwrap();
        assert!(matches!(
            client.prepare("everything", &[]),
            Err(SourceError::MissingCredential)
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = NewsConfig {
            base_url: "https://news.local/v2/".to_string(),
            ..NewsConfig::default()
        };
        let client = NewsApiClient::new(config).unwrap();
        assert_eq!(client.endpoint("everything"), "https://news.local/v2/everything");
    }
}
