//! Reply composition.
//!
//! Builds the text, tags, quick actions, and attachments of every assistant
//! message the engine produces, without contacting any source. Raw error
//! text never reaches a reply: failures are mapped to fixed wording by
//! [`FailureKind`].

use newsdesk_core::{Article, KnowledgeAnswer, NewsCategory};
use newsdesk_sources::FailureKind;

use crate::types::{AttachedResult, HelpTopic, Reply, KNOWLEDGE_ATTRIBUTION, NEWS_ATTRIBUTION};

/// What started a news round trip. Typed queries and quick-action taps are
/// worded differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewsTrigger {
    Typed,
    QuickAction,
}

const DEFAULT_ACTIONS: &[(&str, &str)] = &[
    ("Recommendations", "recommendations"),
    ("App Features", "features"),
    ("Settings", "settings"),
    ("Latest News", "latest_news"),
];

const ASK_AGAIN_ACTIONS: &[(&str, &str)] = &[
    ("Ask Another Question", "ask_anything"),
    ("App Help Instead", "features"),
];

const KNOWLEDGE_RETRY_ACTIONS: &[(&str, &str)] =
    &[("Try Again", "ask_anything"), ("App Features", "features")];

// =============================================================================
// ReplyComposer
// =============================================================================

/// Composes assistant replies.
#[derive(Debug, Clone)]
pub struct ReplyComposer {
    /// Maximum number of items attached to a results reply.
    pub max_results: usize,
}

impl ReplyComposer {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// The message every session opens with.
    pub fn greeting(&self) -> Reply {
        Reply::new(
            "Hello! I'm your personal AI assistant. How can I help you with the app today?",
        )
        .tagged("greeting")
        .with_actions(&[
            ("Read Recommendations", "recommendations"),
            ("App Features", "features"),
            ("Customize Settings", "settings"),
            ("Latest News", "latest_news"),
        ])
    }

    /// Canned answer for an app help sub-intent.
    pub fn help(&self, topic: HelpTopic) -> Reply {
        let reply = match topic {
            HelpTopic::Greeting => {
                Reply::new("Hello there! How can I assist you with the app today?")
            }
            HelpTopic::Recommendation => Reply::new(
                "Based on your reading history, I recommend checking out \"The Future of Mobile UX\" \
                 and \"Design Trends 2025\". Would you like me to find more articles on specific topics?",
            )
            .with_actions(&[
                ("Tech Articles", "tech_articles"),
                ("Design Trends", "design_trends"),
                ("Latest News", "latest_news"),
                ("Ask Anything", "ask_anything"),
            ]),
            HelpTopic::Features => Reply::new(
                "This app offers personalized article recommendations, offline reading, customizable \
                 text size, and dark mode. You can save articles for later and track your reading \
                 stats. What feature would you like to learn more about?",
            )
            .with_actions(&[
                ("Offline Reading", "offline_reading"),
                ("Saving Articles", "saving"),
                ("Customization", "customization"),
            ]),
            HelpTopic::Settings => Reply::new(
                "You can adjust your text size, toggle dark mode, manage notifications, select \
                 preferred news categories, and change language settings. Would you like me to guide \
                 you to a specific settings section?",
            )
            .with_actions(&[
                ("Text Size", "text_size"),
                ("Dark Mode", "dark_mode"),
                ("News Categories", "categories"),
            ]),
            HelpTopic::Theme => Reply::new(
                "You can toggle dark mode in the App Settings section of your profile. Would you like \
                 me to guide you there?",
            )
            .with_actions(&[("Go to Settings", "goto_settings"), ("Stay in Chat", "stay")]),
            HelpTopic::Account => Reply::new(
                "Your profile shows your reading stats and allows you to customize your experience. \
                 You can edit your details, change your password, and adjust notification \
                 preferences. Would you like to know more about any specific profile feature?",
            ),
            HelpTopic::Offline => Reply::new(
                "Offline reading allows you to access articles without an internet connection. To \
                 enable it, go to App Settings in your profile and toggle \"Offline Reading\". \
                 Articles will be automatically downloaded when you save them.",
            ),
            HelpTopic::Gratitude => Reply::new(
                "You're welcome! I'm here anytime you need assistance with the app. Is there anything \
                 else I can help you with?",
            ),
            HelpTopic::Farewell => Reply::new(
                "Goodbye! Feel free to chat with me anytime you need assistance. Have a great day!",
            ),
            HelpTopic::General => Reply::new(
                "I understand you're looking for assistance. Would you like to know about article \
                 recommendations, app features, customizing your settings, or check the latest news?",
            )
            .with_actions(DEFAULT_ACTIONS),
        };
        reply.tagged(topic.tag())
    }

    // ---- News ----

    /// Interim message shown while news is fetched.
    pub fn news_interim(&self, trigger: NewsTrigger, category: NewsCategory) -> Reply {
        let text = match trigger {
            NewsTrigger::Typed => "Let me fetch the latest news for you...".to_string(),
            NewsTrigger::QuickAction if category.is_general() => {
                "Fetching the latest news...".to_string()
            }
            NewsTrigger::QuickAction => format!("Fetching the latest {} news...", category),
        };
        Reply::new(text).tagged("news_fetching")
    }

    /// Results message. At most `max_results` articles are attached.
    pub fn news_results(
        &self,
        trigger: NewsTrigger,
        category: NewsCategory,
        search_term: Option<&str>,
        articles: Vec<Article>,
    ) -> Reply {
        if articles.is_empty() {
            return self.news_empty();
        }

        let text = match (trigger, search_term) {
            (_, Some(term)) => format!("Here are the latest news headlines I found about {}:", term),
            (NewsTrigger::Typed, None) if category.is_general() => {
                "Here are the latest news headlines I found:".to_string()
            }
            (NewsTrigger::Typed, None) => {
                format!("Here are the latest {} news headlines I found:", category)
            }
            (NewsTrigger::QuickAction, None) if category.is_general() => {
                "Here are the latest headlines:".to_string()
            }
            (NewsTrigger::QuickAction, None) => format!("Here are the latest {} headlines:", category),
        };

        let results = articles
            .into_iter()
            .take(self.max_results)
            .map(AttachedResult::Article)
            .collect();

        let actions: &[(&str, &str)] = match trigger {
            NewsTrigger::Typed => &[
                ("More Headlines", "more_news"),
                ("Business News", "business_news"),
                ("Tech News", "tech_news"),
                ("Entertainment", "entertainment_news"),
            ],
            NewsTrigger::QuickAction => &[
                ("Business", "business_news"),
                ("Technology", "tech_news"),
                ("Entertainment", "entertainment_news"),
                ("Back to App", "features"),
            ],
        };

        Reply::new(text)
            .tagged("news_results")
            .with_actions(actions)
            .with_results(results, NEWS_ATTRIBUTION)
    }

    /// The news source returned nothing.
    pub fn news_empty(&self) -> Reply {
        Reply::new("I couldn't find any news articles at the moment. Please try again later.")
            .tagged("news_results")
            .with_actions(&[("Latest News", "latest_news"), ("App Features", "features")])
    }

    /// The news source failed. "Try Again" re-fetches the same category.
    pub fn news_failure(&self, category: NewsCategory) -> Reply {
        Reply::new("I'm having trouble retrieving news right now. Please try again later.")
            .tagged("error")
            .with_actions(&[("Try Again", category.action_key()), ("App Features", "features")])
    }

    // ---- Knowledge ----

    pub fn knowledge_interim(&self) -> Reply {
        Reply::new("Let me find an answer to that question...").tagged("searching")
    }

    /// No usable credential is configured for the knowledge source.
    pub fn knowledge_unavailable(&self) -> Reply {
        Reply::new("I can't answer general questions right now.")
            .tagged("error")
            .with_actions(&[("Ask About App Instead", "features")])
    }

    pub fn knowledge_answer(&self, answer: KnowledgeAnswer) -> Reply {
        if answer.is_empty() {
            return self.knowledge_empty();
        }
        let citations = answer
            .citations
            .into_iter()
            .map(AttachedResult::Citation)
            .collect();
        Reply::new(answer.answer_text)
            .tagged("knowledge_answer")
            .with_actions(ASK_AGAIN_ACTIONS)
            .with_results(citations, KNOWLEDGE_ATTRIBUTION)
    }

    /// The knowledge source had nothing to say.
    pub fn knowledge_empty(&self) -> Reply {
        Reply::new(
            "I couldn't find specific information about that. Would you like to try a different question?",
        )
        .tagged("knowledge_answer")
        .with_actions(ASK_AGAIN_ACTIONS)
    }

    pub fn knowledge_failure(&self, kind: FailureKind) -> Reply {
        let text = match kind {
            FailureKind::Network => {
                "I'm having trouble connecting to my knowledge base. Please check your internet \
                 connection and try again."
            }
            FailureKind::Misconfiguration => {
                "I can't connect to my knowledge source right now. The API key needs to be set up \
                 correctly."
            }
            FailureKind::Other => {
                "I'm having trouble processing your question right now. Please try again later or \
                 ask about app features instead."
            }
        };
        Reply::new(text)
            .tagged("error")
            .with_actions(KNOWLEDGE_RETRY_ACTIONS)
    }
}

impl Default for ReplyComposer {
    fn default() -> Self {
        Self::new(5)
    }
}

// =============================================================================
// Tests
// =============================================================================
