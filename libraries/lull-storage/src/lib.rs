//! Lull Storage
//!
//! Persistence for saved presets and the scheduled auto-stop time.
//!
//! # Architecture
//!
//! - **Backend**: a small string key-value store (`KeyValueStore`), in memory
//!   or as one JSON file on disk
//! - **Presets**: the whole preset list lives under a single key and is only
//!   ever rewritten whole
//! - **Settings**: scalar values such as the last scheduled stop time
//!
//! # Example
//!
//! ```rust
//! use lull_core::{Preset, PresetPlaybackState};
//! use lull_storage::{MemoryStore, PresetStore};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), lull_storage::StorageError> {
//! let presets = PresetStore::new(Arc::new(MemoryStore::new()));
//! presets.append(Preset::new("Rain", vec![PresetPlaybackState::new("rain", 0.5, 60)]))?;
//! assert_eq!(presets.read_all().len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod backend;
mod error;

pub mod presets;
pub mod settings;

pub use backend::{JsonFileStore, KeyValueStore, MemoryStore};
pub use error::{Result, StorageError};
pub use presets::PresetStore;
