//! Intent classifier.
//!
//! Maps a raw user message to an [`Intent`] with ordered, case-insensitive
//! rules. News keywords are checked first and win over everything else,
//! then app-help keywords or a message that is nothing but small talk, and
//! whatever is left is an open question. Classification is pure: the same text always yields the same
//! intent.

use std::sync::LazyLock;

use newsdesk_core::NewsCategory;
use regex::Regex;

use crate::types::{HelpTopic, Intent};

// =============================================================================
// Keyword tables
// =============================================================================

/// Substrings that make a message a news query.
const NEWS_KEYWORDS: &[&str] = &["news", "headlines", "latest", "articles", "stories"];

/// Substrings that make a message an app help request.
const APP_KEYWORDS: &[&str] = &[
    "app",
    "feature",
    "setting",
    "read",
    "article",
    "dark mode",
    "profile",
];

/// Category hints, scanned in order. The first hit wins.
const CATEGORY_HINTS: &[(&str, NewsCategory)] = &[
    ("tech", NewsCategory::Technology),
    ("business", NewsCategory::Business),
    ("entertain", NewsCategory::Entertainment),
    ("health", NewsCategory::Health),
    ("science", NewsCategory::Science),
    ("sports", NewsCategory::Sports),
];

// =============================================================================
// Compiled regex sets (compiled once, reused across calls)
// =============================================================================

struct HelpRule {
    topic: HelpTopic,
    pattern: Regex,
}

static HELP_RULES: LazyLock<Vec<HelpRule>> = LazyLock::new(|| {
    let rule = |topic, pattern: &str| HelpRule {
        topic,
        pattern: Regex::new(pattern).expect("Invalid help regex"),
    };

    vec![
        rule(HelpTopic::Greeting, r"\b(?:hello|hi|hey|greetings)\b"),
        rule(HelpTopic::Recommendation, r"recommend|suggestion|what.*(?:read|article)"),
        rule(HelpTopic::Features, r"feature|can.*do|how.*use"),
        rule(HelpTopic::Settings, r"setting|preference|customize|personalize"),
        rule(HelpTopic::Theme, r"dark mode|light mode|theme"),
        rule(HelpTopic::Account, r"profile|account|user"),
        rule(HelpTopic::Offline, r"offline|download"),
        rule(HelpTopic::Gratitude, r"\bthank"),
        rule(HelpTopic::Farewell, r"\b(?:bye|goodbye|exit|close)\b"),
    ]
});

/// A message made only of a greeting, thanks, or a goodbye. Small talk inside
/// a longer question does not count.
static SMALL_TALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:hi|hello|hey|greetings|thanks?(?: you)?(?: (?:so|very) much| a lot)?|bye|goodbye)(?: there)?[!.?, ]*$",
    )
    .expect("Invalid small talk regex")
});

static SEARCH_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:news|headlines|articles|stories)\s+(?:about|on|regarding|for)\s+(.+)$")
        .expect("Invalid search term regex")
});

// =============================================================================
// IntentClassifier
// =============================================================================

/// Rule-based intent classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a user message.
    pub fn classify(&self, text: &str) -> Intent {
        let lower = text.trim().to_lowercase();

        if contains_any(&lower, NEWS_KEYWORDS) {
            let category = Self::category_hint(&lower);
            let search_term = if category.is_general() {
                Self::search_term(&lower)
            } else {
                None
            };
            return Intent::NewsQuery {
                category,
                search_term,
            };
        }

        let has_app_keyword = contains_any(&lower, APP_KEYWORDS);
        if has_app_keyword || SMALL_TALK_RE.is_match(&lower) {
            return Intent::AppHelp(Self::help_topic(&lower));
        }

        Intent::OpenQuestion
    }

    /// First category hint found in `lower`, or `General`.
    pub fn category_hint(lower: &str) -> NewsCategory {
        CATEGORY_HINTS
            .iter()
            .find(|(hint, _)| lower.contains(hint))
            .map(|(_, category)| *category)
            .unwrap_or_default()
    }

    /// App help sub-intent, first matching rule wins.
    pub fn help_topic(lower: &str) -> HelpTopic {
        HELP_RULES
            .iter()
            .find(|r| r.pattern.is_match(lower))
            .map(|r| r.topic)
            .unwrap_or(HelpTopic::General)
    }

    /// Free-text subject of phrases like "news about electric cars".
    pub fn search_term(lower: &str) -> Option<String> {
        let caps = SEARCH_TERM_RE.captures(lower)?;
        let term = caps
            .get(1)?
            .as_str()
            .trim()
            .trim_end_matches(['?', '.', '!'])
            .trim();
        if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentClassifier::new().classify(text)
    }

    fn news(category: NewsCategory) -> Intent {
        Intent::NewsQuery {
            category,
            search_term: None,
        }
    }

    // ---- News queries ----

    #[test]
    fn test_latest_tech_news() {
        assert_eq!(
            classify("What's the latest tech news"),
            news(NewsCategory::Technology)
        );
    }

    #[test]
    fn test_news_without_hint_is_general() {
        assert_eq!(classify("Show me the headlines"), news(NewsCategory::General));
    }

    #[test]
    fn test_category_hints() {
        assert_eq!(classify("business news please"), news(NewsCategory::Business));
        assert_eq!(
            classify("entertainment stories"),
            news(NewsCategory::Entertainment)
        );
        assert_eq!(classify("health headlines"), news(NewsCategory::Health));
        assert_eq!(classify("science news"), news(NewsCategory::Science));
        assert_eq!(classify("latest sports"), news(NewsCategory::Sports));
    }

    #[test]
    fn test_category_hint_order_first_wins() {
        // "tech" is scanned before "business".
        assert_eq!(
            classify("business and tech news"),
            news(NewsCategory::Technology)
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("LATEST SPORTS NEWS"), news(NewsCategory::Sports));
    }

    #[test]
    fn test_news_keyword_beats_app_keyword() {
        assert_eq!(
            classify("news about the app settings"),
            Intent::NewsQuery {
                category: NewsCategory::General,
                search_term: Some("the app settings".to_string()),
            }
        );
        assert_eq!(
            classify("recommend some articles"),
            news(NewsCategory::General)
        );
        assert_eq!(classify("hi, any news?"), news(NewsCategory::General));
    }

    #[test]
    fn test_news_keyword_always_wins_over_app_words() {
        for news_word in NEWS_KEYWORDS {
            for app_word in APP_KEYWORDS {
                let text = format!("{} {}", app_word, news_word);
                assert!(
                    matches!(classify(&text), Intent::NewsQuery { .. }),
                    "{text:?} should be a news query"
                );
            }
        }
    }

    // ---- Search terms ----

    #[test]
    fn test_search_term_extracted() {
        assert_eq!(
            classify("Any news about electric cars?"),
            Intent::NewsQuery {
                category: NewsCategory::General,
                search_term: Some("electric cars".to_string()),
            }
        );
    }

    #[test]
    fn test_search_term_ignored_with_category_hint() {
        assert_eq!(
            classify("news about tech startups"),
            news(NewsCategory::Technology)
        );
    }

    #[test]
    fn test_search_term_requires_preposition() {
        assert_eq!(IntentClassifier::search_term("latest news"), None);
        assert_eq!(IntentClassifier::search_term("stories on   "), None);
        assert_eq!(
            IntentClassifier::search_term("headlines regarding the election."),
            Some("the election".to_string())
        );
    }

    // ---- App help ----

    #[test]
    fn test_app_help_topics() {
        assert_eq!(
            classify("What can this app do?"),
            Intent::AppHelp(HelpTopic::Features)
        );
        assert_eq!(
            classify("How do I change my settings"),
            Intent::AppHelp(HelpTopic::Settings)
        );
        assert_eq!(
            classify("Is there a dark mode?"),
            Intent::AppHelp(HelpTopic::Theme)
        );
        assert_eq!(
            classify("Where is my profile"),
            Intent::AppHelp(HelpTopic::Account)
        );
        assert_eq!(
            classify("can I read offline"),
            Intent::AppHelp(HelpTopic::Offline)
        );
        assert_eq!(
            classify("what should I read"),
            Intent::AppHelp(HelpTopic::Recommendation)
        );
    }

    #[test]
    fn test_offline_topic() {
        assert_eq!(
            IntentClassifier::help_topic("download for offline reading"),
            HelpTopic::Offline
        );
    }

    #[test]
    fn test_app_keyword_without_sub_rule_is_general_help() {
        assert_eq!(
            classify("this app is neat"),
            Intent::AppHelp(HelpTopic::General)
        );
    }

    #[test]
    fn test_small_talk_is_app_help() {
        assert_eq!(classify("thanks"), Intent::AppHelp(HelpTopic::Gratitude));
        assert_eq!(classify("Thank you!"), Intent::AppHelp(HelpTopic::Gratitude));
        assert_eq!(classify("hello"), Intent::AppHelp(HelpTopic::Greeting));
        assert_eq!(classify("bye"), Intent::AppHelp(HelpTopic::Farewell));
        assert_eq!(classify("Hey there!"), Intent::AppHelp(HelpTopic::Greeting));
        assert_eq!(
            classify("thank you so much."),
            Intent::AppHelp(HelpTopic::Gratitude)
        );
    }

    #[test]
    fn test_greeting_requires_word_boundary() {
        // "hi" inside "this" or "which" is not a greeting.
        assert_eq!(classify("which planet is this"), Intent::OpenQuestion);
    }

    #[test]
    fn test_small_talk_inside_a_question_is_open_question() {
        for text in [
            "how close is the moon to earth",
            "what is the exit velocity of a rocket",
            "hey, what is quantum computing",
            "who said thank you for your service",
            "why do people say goodbye at airports",
        ] {
            assert_eq!(classify(text), Intent::OpenQuestion, "{text:?}");
        }
    }

    // ---- Open questions ----

    #[test]
    fn test_open_question() {
        assert_eq!(classify("What is quantum computing?"), Intent::OpenQuestion);
        assert_eq!(classify("who won the election"), Intent::OpenQuestion);
    }

    #[test]
    fn test_empty_text_is_open_question() {
        assert_eq!(classify(""), Intent::OpenQuestion);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = IntentClassifier::new();
        for text in ["latest tech news", "thanks", "what is a black hole"] {
            assert_eq!(c.classify(text), c.classify(text));
        }
    }
}
