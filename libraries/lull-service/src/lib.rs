//! Lull Service
//!
//! Command plumbing around the player manager.
//!
//! # Architecture
//!
//! - **Command**: the decoded form of every request (`PLAY_SOUND`,
//!   `SCHEDULE_STOP_PLAYBACK`, ...) plus builders for each
//! - **Controller**: routes commands to the manager and owns the auto-stop
//!   timer; errors end here as log lines
//! - **Service**: one thread owning manager and controller, fed by a single
//!   queue shared by commands, focus callbacks, and queries
//!
//! # Example
//!
//! ```rust,no_run
//! use lull_core::{Sound, StaticCatalog, SystemClock};
//! use lull_playback::test_support::{RecordingEngine, ScriptedFocus};
//! use lull_playback::PlayerManager;
//! use lull_service::{Command, PlaybackController, PlaybackService, ServiceConfig};
//! use lull_storage::{MemoryStore, PresetStore};
//! use std::sync::Arc;
//!
//! # struct NoVolume;
//! # impl lull_core::DeviceVolume for NoVolume {
//! #     fn set_media_volume(&mut self, _level: u32) {}
//! # }
//! # fn example() -> lull_service::Result<()> {
//! let config = ServiceConfig::default();
//! let store = Arc::new(MemoryStore::new());
//! let manager = PlayerManager::new(
//!     config.playback.clone(),
//!     Arc::new(RecordingEngine::new()),
//!     Arc::new(StaticCatalog::new([Sound::looping("rain", &[])])),
//!     Box::new(ScriptedFocus::new()),
//!     PresetStore::new(store.clone()),
//! );
//! let controller = PlaybackController::new(Box::new(NoVolume), store, Arc::new(SystemClock));
//!
//! let service = PlaybackService::spawn(&config, manager, controller)?;
//! service.handle().send(Command::play_sound("rain"))?;
//! service.shutdown()?;
//! # Ok(())
//! # }
//! ```

mod command;
mod config;
mod controller;
mod error;
mod scheduler;
mod service;

pub use command::Command;
pub use config::ServiceConfig;
pub use controller::{remaining_auto_stop, PlaybackController};
pub use error::{Result, ServiceError};
pub use scheduler::AutoStopScheduler;
pub use service::{FocusListener, PlaybackService, ServiceHandle, ServiceMessage};
