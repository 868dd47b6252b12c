//! Spoken output of assistant replies.
//!
//! The engine hands the text of every assistant message to a
//! [`SpeechSink`] while voice is enabled. Speaking is fire-and-forget: sinks
//! report nothing back, so a failing synthesizer never affects the
//! conversation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use newsdesk_core::config::VoiceConfig;
use tracing::info;

/// One utterance with its delivery settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
    pub pitch: f32,
    pub rate: f32,
}

/// Text-to-speech backend.
pub trait SpeechSink: Send + Sync {
    fn speak(&self, utterance: &Utterance);
}

/// Sink that writes utterances to the log, for terminals without a
/// synthesizer.
#[derive(Debug, Default)]
pub struct TracingSpeechSink;

impl SpeechSink for TracingSpeechSink {
    fn speak(&self, utterance: &Utterance) {
        info!(
            language = %utterance.language,
            rate = utterance.rate,
            "speak: {}",
            utterance.text
        );
    }
}

/// Sink that keeps every utterance, for tests.
#[derive(Debug, Default)]
pub struct RecordingSpeechSink {
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingSpeechSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts spoken so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .map(|s| s.iter().map(|u| u.text.clone()).collect())
            .unwrap_or_default()
    }
}

impl SpeechSink for RecordingSpeechSink {
    fn speak(&self, utterance: &Utterance) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(utterance.clone());
        }
    }
}

/// Voice output toggle and delivery settings.
pub struct VoiceOutput {
    sink: Option<Arc<dyn SpeechSink>>,
    enabled: AtomicBool,
    language: String,
    pitch: f32,
    rate: f32,
}

impl VoiceOutput {
    /// Voice output through `sink`, initially enabled per `config`.
    pub fn new(config: &VoiceConfig, sink: Arc<dyn SpeechSink>) -> Self {
        Self {
            sink: Some(sink),
            enabled: AtomicBool::new(config.enabled),
            language: config.language.clone(),
            pitch: config.pitch,
            rate: config.rate,
        }
    }

    /// No sink at all; enabling has no effect.
    pub fn disabled() -> Self {
        let config = VoiceConfig::default();
        Self {
            sink: None,
            enabled: AtomicBool::new(false),
            language: config.language,
            pitch: config.pitch,
            rate: config.rate,
        }
    }

    pub fn is_available(&self) -> bool {
        self.sink.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some() && self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Flip the toggle and return the new state.
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::Relaxed);
        enabled && self.sink.is_some()
    }

    /// Speak `text` if voice is enabled.
    pub fn speak(&self, text: &str) {
        if !self.is_enabled() {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.speak(&Utterance {
                text: text.to_string(),
                language: self.language.clone(),
                pitch: self.pitch,
                rate: self.rate,
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
