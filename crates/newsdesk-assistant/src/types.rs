//! Conversation data model: messages, quick actions, intents, and events.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use newsdesk_core::{Article, Citation, NewsCategory};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attribution shown on replies built from news source results.
pub const NEWS_ATTRIBUTION: &str = "NewsAPI";

/// Attribution shown on replies built from knowledge source answers.
pub const KNOWLEDGE_ATTRIBUTION: &str = "knowledge source";

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a message, unique and increasing within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one inbound event's round trip.
///
/// Scoped to the session that issued it, so a request outliving a reset can
/// never match a request of the new session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub session: Uuid,
    pub seq: u64,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.session, self.seq)
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

/// A tappable suggestion attached to an assistant message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    /// Position-based identifier, unique within its message.
    pub id: String,
    pub label: String,
    pub action_key: String,
}

impl QuickAction {
    /// Build an action list from `(label, action_key)` pairs, numbering ids
    /// from 1 in order.
    pub fn list(pairs: &[(&str, &str)]) -> Vec<QuickAction> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (label, key))| QuickAction {
                id: (i + 1).to_string(),
                label: (*label).to_string(),
                action_key: (*key).to_string(),
            })
            .collect()
    }
}

/// A retrieved item carried by a message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttachedResult {
    Article(Article),
    Citation(Citation),
}

impl AttachedResult {
    pub fn title(&self) -> &str {
        match self {
            AttachedResult::Article(a) => &a.title,
            AttachedResult::Citation(c) => &c.title,
        }
    }

    pub fn link(&self) -> &str {
        match self {
            AttachedResult::Article(a) => &a.url,
            AttachedResult::Citation(c) => &c.url,
        }
    }

    /// Short text shown under the title.
    pub fn summary(&self) -> Option<&str> {
        match self {
            AttachedResult::Article(a) => a.description.as_deref(),
            AttachedResult::Citation(c) => Some(&c.snippet),
        }
    }
}

/// One entry in the transcript. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    pub created_at: DateTime<Local>,
    /// Classifier label, kept for analytics and tests.
    pub intent_tag: Option<String>,
    pub quick_actions: Vec<QuickAction>,
    pub attached_results: Vec<AttachedResult>,
    /// Data source named once on messages that carry results.
    pub attribution: Option<String>,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    pub fn is_assistant(&self) -> bool {
        self.origin == Origin::Assistant
    }

    /// Look up an attached quick action by its id or its action key.
    pub fn find_action(&self, id_or_key: &str) -> Option<&QuickAction> {
        self.quick_actions
            .iter()
            .find(|a| a.id == id_or_key || a.action_key == id_or_key)
    }
}

/// Content of an assistant message before the session stamps it with an id
/// and a creation time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reply {
    pub text: String,
    pub intent_tag: Option<String>,
    pub quick_actions: Vec<QuickAction>,
    pub attached_results: Vec<AttachedResult>,
    pub attribution: Option<String>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.intent_tag = Some(tag.into());
        self
    }

    pub fn with_actions(mut self, pairs: &[(&str, &str)]) -> Self {
        self.quick_actions = QuickAction::list(pairs);
        self
    }

    /// Attach retrieved items. Attribution is only recorded when there is
    /// something to attribute.
    pub fn with_results(mut self, results: Vec<AttachedResult>, attribution: &str) -> Self {
        if !results.is_empty() {
            self.attribution = Some(attribution.to_string());
        }
        self.attached_results = results;
        self
    }
}

// =============================================================================
// Intents
// =============================================================================

/// Sub-intent of an app help request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HelpTopic {
    Greeting,
    Recommendation,
    Features,
    Settings,
    Theme,
    Account,
    Offline,
    Gratitude,
    Farewell,
    General,
}

impl HelpTopic {
    /// Analytics tag recorded on the reply.
    pub fn tag(self) -> &'static str {
        match self {
            HelpTopic::Greeting => "greeting",
            HelpTopic::Recommendation => "recommendation",
            HelpTopic::Features => "features",
            HelpTopic::Settings | HelpTopic::Theme => "settings",
            HelpTopic::Account => "account",
            HelpTopic::Offline => "feature_explanation",
            HelpTopic::Gratitude => "gratitude",
            HelpTopic::Farewell => "farewell",
            HelpTopic::General => "general",
        }
    }
}

/// Classified purpose of a user message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Wants news. `search_term` is only set when no category was hinted.
    NewsQuery {
        category: NewsCategory,
        search_term: Option<String>,
    },
    /// Wants help with the app itself, or small talk.
    AppHelp(HelpTopic),
    /// Anything else, answered by the knowledge source.
    OpenQuestion,
}

impl Intent {
    /// Whether handling this intent contacts an external source.
    pub fn needs_source(&self) -> bool {
        !matches!(self, Intent::AppHelp(_))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Intent::NewsQuery { .. } => "news",
            Intent::AppHelp(topic) => topic.tag(),
            Intent::OpenQuestion => "general_question",
        }
    }
}

// =============================================================================
// Events and outcomes
// =============================================================================

/// Change notifications published by a session.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    MessageAppended(Arc<Message>),
    BusyChanged(bool),
    /// A session was opened; any earlier transcript is gone. Published
    /// before the greeting is appended.
    Opened { session_id: Uuid },
}

/// Result of one inbound event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundTripOutcome {
    /// The round trip ran to completion and appended `appended` assistant
    /// messages.
    Completed { request: RequestId, appended: usize },
    /// A newer inbound event superseded this one before it finished; its
    /// late results were discarded.
    Superseded { request: RequestId },
}

impl RoundTripOutcome {
    pub fn request(&self) -> RequestId {
        match self {
            RoundTripOutcome::Completed { request, .. } => *request,
            RoundTripOutcome::Superseded { request } => *request,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, RoundTripOutcome::Superseded { .. })
    }
}
