//! Action-menu engine.
//!
//! Resolves the action key of a tapped quick action. Most keys map to a
//! fixed reply; news keys send the router back to the news source for a
//! category; `ask_anything` prompts for a question and arms the
//! open-question override. Unknown keys get a clarification reply, so
//! resolution never fails.

use newsdesk_core::NewsCategory;

use crate::types::Reply;

/// Key of the action that routes the next submission to the knowledge
/// source.
pub const ASK_ANYTHING: &str = "ask_anything";

/// What to do for a tapped quick action.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionResolution {
    /// Append this reply; no external call.
    Canned(Reply),
    /// Fetch headlines for this category.
    News(NewsCategory),
    /// Append this prompt and treat the next submission as an open question.
    AskAnything(Reply),
    /// Unknown key; append this clarification reply.
    Unrecognized(Reply),
}

struct CannedAction {
    key: &'static str,
    tag: &'static str,
    text: &'static str,
    actions: &'static [(&'static str, &'static str)],
}

const NEWS_ACTIONS: &[(&str, NewsCategory)] = &[
    ("latest_news", NewsCategory::General),
    ("more_news", NewsCategory::General),
    ("news_articles", NewsCategory::General),
    ("business_news", NewsCategory::Business),
    ("entertainment_news", NewsCategory::Entertainment),
    ("health_news", NewsCategory::Health),
    ("science_news", NewsCategory::Science),
    ("sports_news", NewsCategory::Sports),
    ("tech_news", NewsCategory::Technology),
];

const CANNED_ACTIONS: &[CannedAction] = &[
    CannedAction {
        key: "recommendations",
        tag: "recommendation",
        text: "I can recommend articles based on your reading history and preferences. What type of \
               content are you interested in?",
        actions: &[
            ("Technology", "tech_articles"),
            ("Design", "design_articles"),
            ("News", "latest_news"),
            ("Ask Anything", ASK_ANYTHING),
        ],
    },
    CannedAction {
        key: "features",
        tag: "features",
        text: "This app has several features including personalized recommendations, offline \
               reading, customizable text size, and more. Which feature would you like to explore?",
        actions: &[
            ("Reading Stats", "stats"),
            ("Offline Mode", "offline_reading"),
            ("Dark Mode", "dark_mode"),
        ],
    },
    CannedAction {
        key: "settings",
        tag: "settings",
        text: "You can customize your experience by adjusting text size, enabling dark mode, setting \
               notification preferences, and more. What would you like to customize?",
        actions: &[
            ("Reading Preferences", "reading_prefs"),
            ("Notifications", "notifications"),
            ("Theme Settings", "theme"),
        ],
    },
    CannedAction {
        key: "tech_articles",
        tag: "article_recommendation",
        text: "Based on your interests, I recommend these technology articles: \"AI in 2025: \
               Breakthrough Applications\", \"The Evolution of Mobile Development\", and \"Quantum \
               Computing Explained\".",
        actions: &[],
    },
    CannedAction {
        key: "design_articles",
        tag: "article_recommendation",
        text: "For design content, check out: \"UI Trends to Watch in 2025\", \"Accessible Design \
               Principles\", and \"The Psychology of Color in Mobile Apps\".",
        actions: &[],
    },
    CannedAction {
        key: "design_trends",
        tag: "article_recommendation",
        text: "For design content, check out: \"UI Trends to Watch in 2025\", \"Accessible Design \
               Principles\", and \"The Psychology of Color in Mobile Apps\".",
        actions: &[],
    },
    CannedAction {
        key: "offline_reading",
        tag: "feature_explanation",
        text: "Offline reading lets you access articles without an internet connection. To use it: \
               1) Enable the feature in App Settings, 2) Save articles you want to read offline, \
               3) Access them anytime from your Saved list.",
        actions: &[],
    },
    CannedAction {
        key: "saving",
        tag: "feature_explanation",
        text: "Tap the bookmark icon on any article to save it. Saved articles appear in your Saved \
               list and are downloaded for offline reading when that option is enabled.",
        actions: &[("Offline Reading", "offline_reading")],
    },
    CannedAction {
        key: "customization",
        tag: "feature_explanation",
        text: "You can tailor the app by choosing text size, switching between light and dark \
               themes, and picking the news categories that appear in your feed.",
        actions: &[
            ("Text Size", "text_size"),
            ("Dark Mode", "dark_mode"),
            ("News Categories", "categories"),
        ],
    },
    CannedAction {
        key: "stats",
        tag: "feature_explanation",
        text: "Your reading stats live on your profile: articles read, reading streaks, and the \
               categories you follow most.",
        actions: &[],
    },
    CannedAction {
        key: "goto_settings",
        tag: "navigation",
        text: "To access settings, close this chat and go to the App Settings section in your \
               profile. There you can toggle dark mode, adjust text size, and manage other \
               preferences.",
        actions: &[],
    },
    CannedAction {
        key: "stay",
        tag: "navigation",
        text: "No problem, I'm still here. What else would you like to know?",
        actions: &[
            ("App Features", "features"),
            ("Latest News", "latest_news"),
        ],
    },
    CannedAction {
        key: "reading_prefs",
        tag: "settings_help",
        text: "Reading preferences are in Content Preferences. You can set text size and choose \
               which news categories appear in your feed.",
        actions: &[("Text Size", "text_size"), ("News Categories", "categories")],
    },
    CannedAction {
        key: "notifications",
        tag: "settings_help",
        text: "Notification preferences are in App Settings. You can turn breaking news alerts \
               and daily digests on or off.",
        actions: &[],
    },
    CannedAction {
        key: "theme",
        tag: "settings_help",
        text: "You can toggle dark mode in the App Settings section of your profile, or use the \
               sun/moon icon in the profile header.",
        actions: &[("Dark Mode", "dark_mode")],
    },
    CannedAction {
        key: "text_size",
        tag: "settings_help",
        text: "You can change text size in Content Preferences. Options include Small, Medium, and \
               Large. This affects readability throughout the app.",
        actions: &[],
    },
    CannedAction {
        key: "dark_mode",
        tag: "settings_help",
        text: "Dark mode reduces eye strain in low-light environments and can save battery life on \
               OLED screens. Toggle it in App Settings or use the sun/moon icon in the profile \
               header.",
        actions: &[],
    },
    CannedAction {
        key: "categories",
        tag: "settings_help",
        text: "In Content Preferences, you can select which news categories appear in your feed. \
               Options include Technology, Design, Business, Science, Health, and more.",
        actions: &[],
    },
];

/// Lookup table from action key to resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionMenu;

impl ActionMenu {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an action key. Keys are matched exactly after trimming.
    pub fn resolve(&self, action_key: &str) -> ActionResolution {
        let key = action_key.trim();

        if let Some((_, category)) = NEWS_ACTIONS.iter().find(|(k, _)| *k == key) {
            return ActionResolution::News(*category);
        }

        if key == ASK_ANYTHING {
            return ActionResolution::AskAnything(
                Reply::new(
                    "I can answer questions about a wide range of topics. What would you like to know?",
                )
                .tagged("ask_prompt"),
            );
        }

        match CANNED_ACTIONS.iter().find(|a| a.key == key) {
            Some(action) => ActionResolution::Canned(
                Reply::new(action.text)
                    .tagged(action.tag)
                    .with_actions(action.actions),
            ),
            None => ActionResolution::Unrecognized(
                Reply::new(
                    "I understand you want to know more. Could you provide additional details about \
                     what you're looking for?",
                )
                .tagged("clarification"),
            ),
        }
    }

    /// Whether `action_key` has a dedicated entry.
    pub fn is_known(&self, action_key: &str) -> bool {
        !matches!(self.resolve(action_key), ActionResolution::Unrecognized(_))
    }
}
