/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::{FocusRequestResult, Sound, SoundTag};

/// Raw handle to one opened sound stream
///
/// Calls are fire-and-forget: the manager never blocks on hardware.
pub trait EngineHandle: Send {
    /// Start or resume output from the current position
    fn start(&mut self);

    /// Halt output, keeping position
    fn pause(&mut self);

    /// Halt output and rewind
    fn stop(&mut self);

    /// Set linear gain in `0.0..=1.0`
    fn set_volume(&mut self, volume: f32);

    /// Free the underlying stream. The handle is unusable afterwards.
    fn release(&mut self);
}

/// Opaque sound engine that decodes and mixes catalog assets
pub trait PlaybackEngine: Send + Sync {
    /// Open a stream for the given sound key
    ///
    /// # Errors
    /// Returns an error if the asset cannot be opened
    fn open(&self, sound_key: &str) -> Result<Box<dyn EngineHandle>>;
}

/// Platform negotiation for exclusive audio output
///
/// Later changes (gain, losses, resolution of a delayed request) are delivered
/// asynchronously by the platform adapter, not through this trait.
pub trait FocusArbiter: Send {
    /// Ask for exclusive output
    fn request_focus(&mut self) -> FocusRequestResult;

    /// Give exclusive output back
    fn abandon_focus(&mut self);
}

/// Sound metadata lookup
pub trait SoundCatalog: Send + Sync {
    /// Look up one sound by key
    fn get(&self, sound_key: &str) -> Option<Sound>;

    /// All sounds carrying `tag`, or the full catalog when `tag` is `None`
    fn filter(&self, tag: Option<SoundTag>) -> Vec<Sound>;
}

/// System output volume of the device
pub trait DeviceVolume: Send {
    /// Set the media stream volume to `level` (platform units)
    fn set_media_volume(&mut self, level: u32);
}

/// Time source for persisted schedule targets
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_millis(&self) -> i64;
}
