//! Playback Events
//!
//! Observers (UI, notification) get a bare "something changed" signal and
//! re-query the manager for whatever they display.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Events emitted by the player manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Mix, transport, or focus state changed
    StateChanged,

    /// The saved preset list was rewritten
    PresetsChanged,
}

/// Fan-out of playback events to subscribers
///
/// Subscribers whose receiver was dropped are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<PlaybackEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
