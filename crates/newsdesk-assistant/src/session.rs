//! Dialog session state.
//!
//! Owns the append-only transcript, the pending request marker used to
//! discard stale results, the one-shot open-question override, and the
//! session's view of the presence signal. Every mutation is published on
//! the session event channel.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::presence::PresenceSignal;
use crate::types::{Message, MessageId, Origin, Reply, RequestId, SessionEvent};

/// One conversation from open to close.
pub struct DialogSession {
    id: Uuid,
    opened_at: DateTime<Local>,
    messages: Vec<Arc<Message>>,
    next_message_id: u64,
    next_request_seq: u64,
    pending_request: Option<RequestId>,
    force_open_question: bool,
    presence: PresenceSignal,
    events: broadcast::Sender<SessionEvent>,
}

impl DialogSession {
    /// Open a session whose transcript starts with the `greeting` message.
    ///
    /// The presence signal is cleared: nothing is in flight in a new session.
    pub fn open(
        greeting: Reply,
        presence: PresenceSignal,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            opened_at: Local::now(),
            messages: Vec::new(),
            next_message_id: 1,
            next_request_seq: 1,
            pending_request: None,
            force_open_question: false,
            presence,
            events,
        };
        let _ = session.events.send(SessionEvent::Opened {
            session_id: session.id,
        });
        session.set_busy(false);
        session.append_assistant(greeting);
        debug!(session_id = %session.id, "Dialog session opened");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    // ---- Transcript ----

    /// Append a user message.
    pub fn append_user(&mut self, text: &str) -> Arc<Message> {
        let id = self.allocate_message_id();
        self.push(Message {
            id,
            text: text.to_string(),
            origin: Origin::User,
            created_at: Local::now(),
            intent_tag: None,
            quick_actions: Vec::new(),
            attached_results: Vec::new(),
            attribution: None,
        })
    }

    /// Append an assistant message built from `reply`.
    pub fn append_assistant(&mut self, reply: Reply) -> Arc<Message> {
        let id = self.allocate_message_id();
        self.push(Message {
            id,
            text: reply.text,
            origin: Origin::Assistant,
            created_at: Local::now(),
            intent_tag: reply.intent_tag,
            quick_actions: reply.quick_actions,
            attached_results: reply.attached_results,
            attribution: reply.attribution,
        })
    }

    fn allocate_message_id(&mut self) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    fn push(&mut self, message: Message) -> Arc<Message> {
        let message = Arc::new(message);
        self.messages.push(Arc::clone(&message));
        // No subscribers is fine: the transcript is the source of truth.
        let _ = self
            .events
            .send(SessionEvent::MessageAppended(Arc::clone(&message)));
        message
    }

    /// Snapshot of the transcript in order.
    pub fn messages(&self) -> Vec<Arc<Message>> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Arc<Message>> {
        self.messages.last()
    }

    /// Most recent assistant message, the one whose quick actions are live.
    pub fn last_assistant(&self) -> Option<&Arc<Message>> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    // ---- Requests ----

    /// Issue a new request id, superseding any pending one.
    ///
    /// With `show_busy` the presence signal is raised for the duration of
    /// the request; synchronous replies leave it alone.
    pub fn issue_request(&mut self, show_busy: bool) -> RequestId {
        let request = RequestId {
            session: self.id,
            seq: self.next_request_seq,
        };
        self.next_request_seq += 1;
        if let Some(previous) = self.pending_request.replace(request) {
            debug!(superseded = %previous, by = %request, "Request superseded");
        }
        if show_busy {
            self.set_busy(true);
        }
        request
    }

    /// Whether `request` is still the one the session is waiting on.
    pub fn is_current(&self, request: RequestId) -> bool {
        self.pending_request == Some(request)
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending_request
    }

    /// Finish `request` and clear the presence signal. A request that is no
    /// longer current is ignored so it cannot clear a newer request's signal.
    pub fn complete(&mut self, request: RequestId) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.pending_request = None;
        self.set_busy(false);
        true
    }

    // ---- Presence ----

    pub fn is_busy(&self) -> bool {
        self.presence.is_busy()
    }

    /// Set the presence signal, publishing an event when it changes.
    pub fn set_busy(&mut self, busy: bool) {
        if self.presence.set(busy) {
            let _ = self.events.send(SessionEvent::BusyChanged(busy));
        }
    }

    /// Drop and re-raise the presence signal to mark a new phase of the
    /// current request.
    pub fn signal_phase(&mut self) {
        self.set_busy(false);
        self.set_busy(true);
    }

    // ---- Open-question override ----

    /// Route the next user submission to the knowledge source regardless of
    /// how it would classify.
    pub fn arm_open_question(&mut self) {
        self.force_open_question = true;
    }

    /// Consume the override. Returns whether it was armed.
    pub fn take_open_question_override(&mut self) -> bool {
        std::mem::take(&mut self.force_open_question)
    }

    pub fn open_question_armed(&self) -> bool {
        self.force_open_question
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (DialogSession, broadcast::Receiver<SessionEvent>) {
        let (tx, rx) = broadcast::channel(64);
        let session = DialogSession::open(
            Reply::new("Welcome").tagged("greeting"),
            PresenceSignal::new(),
            tx,
        );
        (session, rx)
    }

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // ---- Transcript ----

    #[test]
    fn test_open_seeds_greeting() {
        let (session, _rx) = open();
        assert_eq!(session.len(), 1);
        let greeting = session.last().unwrap();
        assert!(greeting.is_assistant());
        assert_eq!(greeting.text, "Welcome");
        assert_eq!(greeting.id, MessageId(1));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_open_publishes_opened_before_greeting() {
        let (tx, mut rx) = broadcast::channel(16);
        let session = DialogSession::open(Reply::new("Welcome"), PresenceSignal::new(), tx);
        let events = drain(&mut rx);
        assert!(matches!(events[0], SessionEvent::Opened { session_id } if session_id == session.id()));
        assert!(matches!(&events[1], SessionEvent::MessageAppended(m) if m.text == "Welcome"));
    }

    #[test]
    fn test_open_clears_stale_busy() {
        let (tx, _rx) = broadcast::channel(16);
        let presence = PresenceSignal::new();
        presence.set(true);
        let session = DialogSession::open(Reply::new("Welcome"), presence.clone(), tx);
        assert!(!session.is_busy());
        assert!(!presence.is_busy());
    }

    #[test]
    fn test_message_ids_increase() {
        let (mut session, _rx) = open();
        let user = session.append_user("hello");
        let reply = session.append_assistant(Reply::new("hi"));
        assert!(user.id < reply.id);
        let ids: Vec<MessageId> = session.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![MessageId(1), MessageId(2), MessageId(3)]);
    }

    #[test]
    fn test_appends_publish_events() {
        let (mut session, mut rx) = open();
        drain(&mut rx);
        session.append_user("hello");
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], SessionEvent::MessageAppended(m) if m.text == "hello" && m.is_user())
        );
    }

    #[test]
    fn test_last_assistant_skips_user_messages() {
        let (mut session, _rx) = open();
        session.append_user("question");
        assert_eq!(session.last_assistant().unwrap().text, "Welcome");
    }

    // ---- Requests ----

    #[test]
    fn test_newer_request_supersedes_older() {
        let (mut session, _rx) = open();
        let first = session.issue_request(true);
        let second = session.issue_request(true);
        assert_ne!(first, second);
        assert!(!session.is_current(first));
        assert!(session.is_current(second));
    }

    #[test]
    fn test_stale_completion_keeps_busy() {
        let (mut session, _rx) = open();
        let first = session.issue_request(true);
        let second = session.issue_request(true);
        assert!(!session.complete(first));
        assert!(session.is_busy());
        assert!(session.complete(second));
        assert!(!session.is_busy());
        assert!(session.pending_request().is_none());
    }

    #[test]
    fn test_quiet_request_emits_no_busy_event() {
        let (mut session, mut rx) = open();
        drain(&mut rx);
        let request = session.issue_request(false);
        session.append_assistant(Reply::new("canned"));
        session.complete(request);
        let busy_events = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::BusyChanged(_)))
            .count();
        assert_eq!(busy_events, 0);
    }

    #[test]
    fn test_signal_phase_toggles() {
        let (mut session, mut rx) = open();
        let _request = session.issue_request(true);
        drain(&mut rx);
        session.signal_phase();
        let events: Vec<bool> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::BusyChanged(b) => Some(b),
                _ => None,
            })
            .collect();
        assert_eq!(events, vec![false, true]);
        assert!(session.is_busy());
    }

    #[test]
    fn test_request_ids_are_scoped_to_session() {
        let (mut a, _rx_a) = open();
        let (mut b, _rx_b) = open();
        let ra = a.issue_request(false);
        let rb = b.issue_request(false);
        assert_eq!(ra.seq, rb.seq);
        assert_ne!(ra, rb);
        assert!(!b.is_current(ra));
    }

    // ---- Override ----

    #[test]
    fn test_open_question_override_is_one_shot() {
        let (mut session, _rx) = open();
        assert!(!session.take_open_question_override());
        session.arm_open_question();
        assert!(session.open_question_armed());
        assert!(session.take_open_question_override());
        assert!(!session.take_open_question_override());
    }
}
