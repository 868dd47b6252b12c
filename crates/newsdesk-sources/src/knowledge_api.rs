//! Generative knowledge API client (Gemini `generateContent`).

use std::time::Duration;

use async_trait::async_trait;
use newsdesk_core::config::KnowledgeConfig;
use newsdesk_core::{Citation, KnowledgeAnswer};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::KnowledgeSource;

const DEFAULT_CITATION_TITLE: &str = "Related content";
const DEFAULT_CITATION_URL: &str = "#";
const DEFAULT_CITATION_SNIPPET: &str = "Additional information related to your query.";

/// HTTP client for a Gemini-style `generateContent` endpoint.
pub struct GeminiKnowledgeClient {
    client: Client,
    config: KnowledgeConfig,
}

impl GeminiKnowledgeClient {
    /// Build a client from configuration. A missing key is not an error
    /// here; it is reported through [`KnowledgeSource::is_configured`].
    pub fn new(config: KnowledgeConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, text: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: text.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }

    /// Build the authenticated request. Fails before any I/O without a
    /// usable key.
    fn prepare(&self, text: &str) -> Result<reqwest::RequestBuilder, SourceError> {
        let key = self.config.credential().ok_or(SourceError::MissingCredential)?;
        Ok(self
            .client
            .post(self.url())
            .query(&[("key", key)])
            .json(&self.build_request(text)))
    }
}

#[async_trait]
impl KnowledgeSource for GeminiKnowledgeClient {
    fn is_configured(&self) -> bool {
        self.config.has_credential()
    }

    async fn ask(&self, text: &str) -> Result<KnowledgeAnswer, SourceError> {
        let response = self.prepare(text)?.send().await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "Knowledge API returned an error status");
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let answer = parse_answer(&body)?;
        debug!(
            answer_len = answer.answer_text.len(),
            citations = answer.citations.len(),
            "Knowledge answer received"
        );
        Ok(answer)
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    citation_metadata: Option<CitationMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CitationMetadata {
    #[serde(default, alias = "citationSources")]
    citations: Vec<RawCitation>,
}

#[derive(Debug, Deserialize)]
struct RawCitation {
    title: Option<String>,
    uri: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Parse a `generateContent` response body.
///
/// Only the first candidate is used. A response with no text yields an empty
/// [`KnowledgeAnswer`], which callers treat as "nothing found".
pub fn parse_answer(body: &str) -> Result<KnowledgeAnswer, SourceError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(KnowledgeAnswer::default());
    };

    let answer_text = candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .unwrap_or_default();

    let citations = candidate
        .citation_metadata
        .map(|m| m.citations)
        .unwrap_or_default()
        .into_iter()
        .map(|c| Citation {
            title: c.title.unwrap_or_else(|| DEFAULT_CITATION_TITLE.to_string()),
            url: c.uri.unwrap_or_else(|| DEFAULT_CITATION_URL.to_string()),
            snippet: c
                .snippet
                .unwrap_or_else(|| DEFAULT_CITATION_SNIPPET.to_string()),
        })
        .collect();

    Ok(KnowledgeAnswer {
        answer_text,
        citations,
    })
}
