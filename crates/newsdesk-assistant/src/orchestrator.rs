//! Assistant orchestrator: central coordinator wiring classifier, session,
//! action menu, and the external sources.
//!
//! Accepts the two inbound events of a presentation surface, text
//! submissions and quick-action taps, and turns each into one round trip
//! that appends assistant messages to the session. The session lock is never
//! held across a source call; results are applied only if their request is
//! still the session's pending one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use newsdesk_core::config::AssistantConfig;
use newsdesk_core::NewsCategory;
use newsdesk_sources::{KnowledgeSource, NewsSource};
use rand::Rng;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actions::{ActionMenu, ActionResolution};
use crate::classifier::IntentClassifier;
use crate::error::AssistantError;
use crate::presence::PresenceSignal;
use crate::response::{NewsTrigger, ReplyComposer};
use crate::session::DialogSession;
use crate::types::{Intent, Message, QuickAction, Reply, RequestId, RoundTripOutcome, SessionEvent};
use crate::voice::VoiceOutput;

/// Central assistant orchestrator.
pub struct AssistantOrchestrator {
    classifier: IntentClassifier,
    actions: ActionMenu,
    composer: ReplyComposer,
    news: Arc<dyn NewsSource>,
    knowledge: Arc<dyn KnowledgeSource>,
    voice: VoiceOutput,
    presence: PresenceSignal,
    events: broadcast::Sender<SessionEvent>,
    session: Mutex<DialogSession>,
    config: AssistantConfig,
}

impl AssistantOrchestrator {
    /// Create an orchestrator and open its first session.
    pub fn new(
        config: AssistantConfig,
        news: Arc<dyn NewsSource>,
        knowledge: Arc<dyn KnowledgeSource>,
        voice: VoiceOutput,
    ) -> Self {
        let composer = ReplyComposer::new(config.max_attached_results);
        let presence = PresenceSignal::new();
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let session = DialogSession::open(composer.greeting(), presence.clone(), events.clone());

        Self {
            classifier: IntentClassifier::new(),
            actions: ActionMenu::new(),
            composer,
            news,
            knowledge,
            voice,
            presence,
            events,
            session: Mutex::new(session),
            config,
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, DialogSession>, AssistantError> {
        self.session
            .lock()
            .map_err(|e| AssistantError::SessionUnavailable(format!("session lock poisoned: {}", e)))
    }

    // ---- Inbound events ----

    /// Handle a free-text submission.
    ///
    /// Appends the user message, classifies it (or routes it to the
    /// knowledge source if `ask_anything` armed the override), and runs the
    /// round trip to completion or until a newer event supersedes it.
    pub async fn submit_text(&self, text: &str) -> Result<RoundTripOutcome, AssistantError> {
        if !self.config.enabled {
            return Err(AssistantError::Disabled);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        if text.chars().count() > self.config.max_message_length {
            return Err(AssistantError::MessageTooLong(self.config.max_message_length));
        }

        let (intent, request) = {
            let mut session = self.lock_session()?;
            session.append_user(text);
            let intent = if session.take_open_question_override() {
                debug!("Open-question override consumed");
                Intent::OpenQuestion
            } else {
                self.classifier.classify(text)
            };
            let request = session.issue_request(intent.needs_source());
            (intent, request)
        };

        debug!(request = %request, intent = intent.tag(), "User message classified");
        self.handle(intent, text, request).await
    }

    /// Handle a quick-action tap. No user message is appended.
    pub async fn select_action(&self, action_key: &str) -> Result<RoundTripOutcome, AssistantError> {
        if !self.config.enabled {
            return Err(AssistantError::Disabled);
        }

        match self.actions.resolve(action_key) {
            ActionResolution::News(category) => {
                let request = self.lock_session()?.issue_request(true);
                debug!(request = %request, action_key, %category, "News action selected");
                self.fetch_news(NewsTrigger::QuickAction, category, None, request)
                    .await
            }
            ActionResolution::AskAnything(prompt) => {
                let request = {
                    let mut session = self.lock_session()?;
                    session.arm_open_question();
                    session.issue_request(false)
                };
                debug!(request = %request, "Open-question override armed");
                self.finish(request, prompt, 1)
            }
            ActionResolution::Canned(reply) => {
                let request = self.lock_session()?.issue_request(false);
                self.finish(request, reply, 1)
            }
            ActionResolution::Unrecognized(reply) => {
                debug!(action_key, "Unrecognized action key");
                let request = self.lock_session()?.issue_request(false);
                self.finish(request, reply, 1)
            }
        }
    }

    // ---- Routing ----

    /// Route a classified intent. `request` must have been issued by the
    /// current session.
    pub async fn handle(
        &self,
        intent: Intent,
        raw_text: &str,
        request: RequestId,
    ) -> Result<RoundTripOutcome, AssistantError> {
        match intent {
            Intent::AppHelp(topic) => self.finish(request, self.composer.help(topic), 1),
            Intent::NewsQuery {
                category,
                search_term,
            } => {
                self.pause().await;
                self.fetch_news(NewsTrigger::Typed, category, search_term, request)
                    .await
            }
            Intent::OpenQuestion => {
                self.pause().await;
                self.answer_question(raw_text, request).await
            }
        }
    }

    async fn fetch_news(
        &self,
        trigger: NewsTrigger,
        category: NewsCategory,
        search_term: Option<String>,
        request: RequestId,
    ) -> Result<RoundTripOutcome, AssistantError> {
        let Some(interim) = self.begin_phase(request, self.composer.news_interim(trigger, category))?
        else {
            return Ok(RoundTripOutcome::Superseded { request });
        };
        self.voice.speak(&interim.text);

        let result = match &search_term {
            Some(term) => self.news.search(term).await,
            None => self.news.fetch_by_category(category).await,
        };

        let reply = match result {
            Ok(articles) => {
                debug!(request = %request, count = articles.len(), "News fetched");
                self.composer
                    .news_results(trigger, category, search_term.as_deref(), articles)
            }
            Err(err) => {
                warn!(request = %request, %category, kind = ?err.kind(), "News source failed: {}", err);
                self.composer.news_failure(category)
            }
        };
        self.finish(request, reply, 2)
    }

    async fn answer_question(
        &self,
        text: &str,
        request: RequestId,
    ) -> Result<RoundTripOutcome, AssistantError> {
        let Some(interim) = self.begin_phase(request, self.composer.knowledge_interim())? else {
            return Ok(RoundTripOutcome::Superseded { request });
        };
        self.voice.speak(&interim.text);

        if !self.knowledge.is_configured() {
            info!(request = %request, "Knowledge source has no credential, not contacting it");
            return self.finish(request, self.composer.knowledge_unavailable(), 2);
        }

        let reply = match self.knowledge.ask(text).await {
            Ok(answer) => {
                debug!(
                    request = %request,
                    citations = answer.citations.len(),
                    "Knowledge answer received"
                );
                self.composer.knowledge_answer(answer)
            }
            Err(err) => {
                warn!(request = %request, kind = ?err.kind(), "Knowledge source failed: {}", err);
                self.composer.knowledge_failure(err.kind())
            }
        };
        self.finish(request, reply, 2)
    }

    /// Append the interim message of a source round trip and mark the new
    /// phase on the presence signal. Returns `None` if `request` went stale
    /// during the processing delay.
    fn begin_phase(
        &self,
        request: RequestId,
        interim: Reply,
    ) -> Result<Option<Arc<Message>>, AssistantError> {
        let mut session = self.lock_session()?;
        if !session.is_current(request) {
            debug!(request = %request, "Request superseded before dispatch");
            return Ok(None);
        }
        let message = session.append_assistant(interim);
        session.signal_phase();
        Ok(Some(message))
    }

    /// Append the final message of a round trip and clear the presence
    /// signal, unless a newer request superseded this one.
    fn finish(
        &self,
        request: RequestId,
        reply: Reply,
        appended: usize,
    ) -> Result<RoundTripOutcome, AssistantError> {
        let message = {
            let mut session = self.lock_session()?;
            if !session.is_current(request) {
                debug!(request = %request, "Discarding stale result");
                return Ok(RoundTripOutcome::Superseded { request });
            }
            let message = session.append_assistant(reply);
            session.complete(request);
            message
        };
        self.voice.speak(&message.text);
        Ok(RoundTripOutcome::Completed { request, appended })
    }

    // ---- Processing delay ----

    /// Cosmetic pause before contacting a source, drawn uniformly from the
    /// configured bounds.
    pub fn processing_delay(&self) -> Duration {
        let min = self.config.processing_delay_min_ms;
        let max = self.config.processing_delay_max_ms.max(min);
        let ms = if max > min {
            rand::rng().random_range(min..=max)
        } else {
            min
        };
        Duration::from_millis(ms)
    }

    async fn pause(&self) {
        let delay = self.processing_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    // ---- Session lifecycle and queries ----

    /// Discard the transcript and open a fresh seeded session. Round trips
    /// still in flight for the old session are dropped when they resolve.
    pub fn reset(&self) -> Result<Uuid, AssistantError> {
        let mut session = self.lock_session()?;
        *session = DialogSession::open(
            self.composer.greeting(),
            self.presence.clone(),
            self.events.clone(),
        );
        info!(session_id = %session.id(), "Assistant session reset");
        Ok(session.id())
    }

    pub fn session_id(&self) -> Result<Uuid, AssistantError> {
        Ok(self.lock_session()?.id())
    }

    /// Snapshot of the transcript.
    pub fn history(&self) -> Result<Vec<Arc<Message>>, AssistantError> {
        Ok(self.lock_session()?.messages())
    }

    /// Quick actions of the latest assistant message.
    pub fn current_actions(&self) -> Result<Vec<QuickAction>, AssistantError> {
        Ok(self
            .lock_session()?
            .last_assistant()
            .map(|m| m.quick_actions.clone())
            .unwrap_or_default())
    }

    pub fn open_question_armed(&self) -> Result<bool, AssistantError> {
        Ok(self.lock_session()?.open_question_armed())
    }

    pub fn is_busy(&self) -> bool {
        self.presence.is_busy()
    }

    /// Follow the busy flag.
    pub fn presence(&self) -> watch::Receiver<bool> {
        self.presence.subscribe()
    }

    /// Follow session changes. Subscriptions survive [`reset`](Self::reset).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn voice(&self) -> &VoiceOutput {
        &self.voice
    }
}

// =============================================================================
// Tests
// =============================================================================
