//! Lull - Playback Management
//!
//! Platform-agnostic mix playback for Lull.
//!
//! This crate provides:
//! - Per-sound players with idempotent play/pause/stop
//! - A player manager owning the mix and the audio focus state machine
//! - Saved preset playback, saving, removal, and skipping
//! - Random mix generation
//! - Linear fade-out of stopped sounds
//! - State change events for observers
//!
//! # Architecture
//!
//! `lull-playback` never touches audio hardware or platform focus APIs:
//! the engine, focus arbiter, and catalog are provided through the traits in
//! `lull-core`. Everything here runs on the caller's thread; callbacks from
//! the platform must be marshaled onto that thread first (see `lull-service`).
//!
//! # Example
//!
//! ```rust
//! use lull_core::{Sound, StaticCatalog};
//! use lull_playback::test_support::{RecordingEngine, ScriptedFocus};
//! use lull_playback::{PlaybackConfig, PlaybackState, PlayerManager};
//! use lull_storage::{MemoryStore, PresetStore};
//! use std::sync::Arc;
//!
//! let mut manager = PlayerManager::new(
//!     PlaybackConfig::default(),
//!     Arc::new(RecordingEngine::new()),
//!     Arc::new(StaticCatalog::new([Sound::looping("rain", &[])])),
//!     Box::new(ScriptedFocus::new()),
//!     PresetStore::new(Arc::new(MemoryStore::new())),
//! );
//!
//! manager.play("rain").unwrap();
//! assert_eq!(manager.playback_state(), PlaybackState::Playing);
//!
//! manager.stop();
//! assert_eq!(manager.playback_state(), PlaybackState::Stopped);
//! ```

mod error;
mod events;
mod manager;
mod player;
mod random;
mod volume;

pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{PlaybackError, Result};
pub use events::{EventBus, PlaybackEvent};
pub use manager::PlayerManager;
pub use player::{SoundPlayer, MIN_TIME_PERIOD_SECS};
pub use random::random_mix;
pub use types::{FocusState, PlaybackConfig, PlaybackState, PlayerState, SkipDirection};
pub use volume::FadeOut;
