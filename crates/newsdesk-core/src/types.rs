use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NewsdeskError;

// =============================================================================
// NewsCategory
// =============================================================================

/// Headline category understood by the news source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    /// Top headlines with no category filter.
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl NewsCategory {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [NewsCategory; 7] = [
        NewsCategory::General,
        NewsCategory::Business,
        NewsCategory::Entertainment,
        NewsCategory::Health,
        NewsCategory::Science,
        NewsCategory::Sports,
        NewsCategory::Technology,
    ];

    /// Lower-case identifier used on the wire.
    pub fn api_name(self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Business => "business",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
            NewsCategory::Sports => "sports",
            NewsCategory::Technology => "technology",
        }
    }

    /// Quick-action key that re-fetches this category.
    pub fn action_key(self) -> &'static str {
        match self {
            NewsCategory::General => "latest_news",
            NewsCategory::Business => "business_news",
            NewsCategory::Entertainment => "entertainment_news",
            NewsCategory::Health => "health_news",
            NewsCategory::Science => "science_news",
            NewsCategory::Sports => "sports_news",
            NewsCategory::Technology => "tech_news",
        }
    }

    /// Whether this is the unfiltered top-headlines category.
    pub fn is_general(self) -> bool {
        self == NewsCategory::General
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for NewsCategory {
    type Err = NewsdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "general" | "all" => Ok(NewsCategory::General),
            "business" => Ok(NewsCategory::Business),
            "entertainment" => Ok(NewsCategory::Entertainment),
            "health" => Ok(NewsCategory::Health),
            "science" => Ok(NewsCategory::Science),
            "sports" => Ok(NewsCategory::Sports),
            "technology" | "tech" => Ok(NewsCategory::Technology),
            _ => Err(NewsdeskError::UnknownCategory(s.to_string())),
        }
    }
}

// =============================================================================
// Retrieved items
// =============================================================================

/// A news article returned by the news source.
///
/// Sources only return articles that carry a display image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub source_name: String,
}

/// A citation attached to a knowledge-source answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Answer produced by the knowledge source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeAnswer {
    pub answer_text: String,
    pub citations: Vec<Citation>,
}

impl KnowledgeAnswer {
    /// True when the source produced no usable answer text.
    pub fn is_empty(&self) -> bool {
        self.answer_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_api_names() {
        assert_eq!(NewsCategory::Technology.api_name(), "technology");
        assert_eq!(NewsCategory::General.to_string(), "general");
    }

    #[test]
    fn test_category_from_str_accepts_aliases() {
        assert_eq!("tech".parse::<NewsCategory>().unwrap(), NewsCategory::Technology);
        assert_eq!("ALL".parse::<NewsCategory>().unwrap(), NewsCategory::General);
        assert_eq!(" Sports ".parse::<NewsCategory>().unwrap(), NewsCategory::Sports);
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        let err = "weather".parse::<NewsCategory>().unwrap_err();
        assert!(matches!(err, NewsdeskError::UnknownCategory(_)));
    }

    #[test]
    fn test_category_action_keys_are_unique() {
        let mut keys: Vec<&str> = NewsCategory::ALL.iter().map(|c| c.action_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), NewsCategory::ALL.len());
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&NewsCategory::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
    }

    #[test]
    fn test_knowledge_answer_is_empty() {
        assert!(KnowledgeAnswer::default().is_empty());
        let answer = KnowledgeAnswer {
            answer_text: "  \n".to_string(),
            citations: vec![],
        };
        assert!(answer.is_empty());
        let answer = KnowledgeAnswer {
            answer_text: "Quantum computers use qubits.".to_string(),
            citations: vec![],
        };
        assert!(!answer.is_empty());
    }
}
