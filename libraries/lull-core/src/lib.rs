//! Lull Core
//!
//! Platform-agnostic types, collaborator traits, and error handling for the
//! Lull ambient-sound mixer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Preset`, `PresetPlaybackState`, `Sound`, `SoundTag`
//! - **Collaborator Traits**: `PlaybackEngine`, `FocusArbiter`, `SoundCatalog`,
//!   `DeviceVolume`, `Clock`
//! - **Error Handling**: Unified `LullError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lull_core::{Preset, PresetPlaybackState};
//!
//! let preset = Preset::new(
//!     "Rainy night",
//!     vec![
//!         PresetPlaybackState::new("thunder", 0.4, 60),
//!         PresetPlaybackState::new("rain", 0.8, 60),
//!     ],
//! );
//!
//! // States are kept sorted by sound key
//! assert_eq!(preset.playback_states()[0].sound_key, "rain");
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

pub use catalog::StaticCatalog;
pub use clock::SystemClock;
pub use error::{LullError, Result};
pub use traits::{Clock, DeviceVolume, EngineHandle, FocusArbiter, PlaybackEngine, SoundCatalog};
pub use types::{
    clamp_volume, FocusChange, FocusRequestResult, Preset, PresetPlaybackState, Sound, SoundTag,
};
