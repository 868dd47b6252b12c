//! Conversational assistant engine for Newsdesk.
//!
//! Classifies free-text input, routes it to the news or knowledge source,
//! resolves quick-action taps, and keeps an append-only dialog session with
//! a busy signal that tracks in-flight work.

pub mod actions;
pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod presence;
pub mod response;
pub mod session;
pub mod types;
pub mod voice;

pub use actions::{ActionMenu, ActionResolution, ASK_ANYTHING};
pub use classifier::IntentClassifier;
pub use error::AssistantError;
pub use orchestrator::AssistantOrchestrator;
pub use presence::PresenceSignal;
pub use response::{NewsTrigger, ReplyComposer};
pub use session::DialogSession;
pub use types::{
    AttachedResult, HelpTopic, Intent, Message, MessageId, Origin, QuickAction, Reply, RequestId,
    RoundTripOutcome, SessionEvent, KNOWLEDGE_ATTRIBUTION, NEWS_ATTRIBUTION,
};
pub use voice::{RecordingSpeechSink, SpeechSink, TracingSpeechSink, Utterance, VoiceOutput};
