//! Typing/presence signal.
//!
//! A single boolean meaning "the assistant is working on a reply". Backed by
//! a [`watch`] channel so any number of observers can follow it and a late
//! subscriber still sees the current value.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared busy flag. Cloning yields another handle to the same flag.
#[derive(Debug, Clone)]
pub struct PresenceSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl PresenceSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Set the flag. Returns whether the value actually changed; observers
    /// are only woken on a change.
    pub fn set(&self, busy: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == busy {
                false
            } else {
                *current = busy;
                true
            }
        })
    }

    pub fn is_busy(&self) -> bool {
        *self.tx.borrow()
    }

    /// Follow the flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for PresenceSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        assert!(!PresenceSignal::new().is_busy());
    }

    #[test]
    fn test_set_reports_changes_only() {
        let presence = PresenceSignal::new();
        assert!(presence.set(true));
        assert!(!presence.set(true));
        assert!(presence.is_busy());
        assert!(presence.set(false));
        assert!(!presence.is_busy());
    }

    #[test]
    fn test_clones_share_state() {
        let a = PresenceSignal::new();
        let b = a.clone();
        a.set(true);
        assert!(b.is_busy());
    }

    #[tokio::test]
    async fn test_subscriber_is_woken() {
        let presence = PresenceSignal::new();
        let mut rx = presence.subscribe();
        presence.set(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(!rx.has_changed().unwrap());
    }
}
